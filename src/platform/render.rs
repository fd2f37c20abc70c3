// ABOUTME: Render.com deployer.
// ABOUTME: Git-push driven platform with render.yaml service config.

use std::path::PathBuf;

use serde_json::json;

use crate::config::DeployConfig;
use crate::snapshot::DeploymentState;

use super::{Platform, PlatformDeployer};

pub struct RenderDeployer {
    project_root: PathBuf,
    config: DeployConfig,
}

impl RenderDeployer {
    pub fn new(project_root: PathBuf, config: DeployConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    fn has_render_config(&self) -> bool {
        self.project_root.join("render.yaml").is_file()
    }
}

impl PlatformDeployer for RenderDeployer {
    fn platform(&self) -> Platform {
        Platform::Render
    }

    fn validate(&self) -> bool {
        tracing::info!("Validating Render deployment readiness...");
        super::run_validation_checks(
            Platform::Render,
            &[
                ("Render configuration file", self.has_render_config()),
                // Render injects environment variables at deploy time.
                ("Environment variables", true),
            ],
        )
    }

    fn prepare(&self) -> bool {
        tracing::info!("Preparing Render deployment...");
        if !self.has_render_config() {
            return super::write_template(&self.project_root, "render.yaml", &self.config_template());
        }
        true
    }

    fn deploy(&self) -> bool {
        tracing::info!("Deploying to Render...");
        tracing::info!("Push your changes to trigger Render deployment");
        tracing::info!("Render automatically deploys from git commits");
        true
    }

    fn config_template(&self) -> serde_json::Value {
        json!({
            "services": [
                {
                    "type": "web",
                    "name": self.config.app_name.clone().unwrap_or_else(|| "my-app".into()),
                    "env": "python",
                    "plan": "free",
                    "buildCommand": "pip install -r requirements.txt",
                    "startCommand": "python app.py",
                }
            ]
        })
    }

    fn rollback(&self, state: &DeploymentState) -> bool {
        tracing::info!("Triggering Render redeployment of restored snapshot {}...", state.id);
        tracing::info!("Push the restored code or click 'Manual Deploy' inside the Render dashboard");
        self.deploy()
    }
}
