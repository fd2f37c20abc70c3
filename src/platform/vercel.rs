// ABOUTME: Vercel deployer.
// ABOUTME: Python apps on Vercel need vercel.json and an app.py entry point.

use std::path::PathBuf;

use serde_json::json;

use crate::config::DeployConfig;
use crate::snapshot::DeploymentState;

use super::{Platform, PlatformDeployer};

pub struct VercelDeployer {
    project_root: PathBuf,
    #[allow(dead_code)]
    config: DeployConfig,
}

impl VercelDeployer {
    pub fn new(project_root: PathBuf, config: DeployConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    fn has_vercel_json(&self) -> bool {
        self.project_root.join("vercel.json").is_file()
    }
}

impl PlatformDeployer for VercelDeployer {
    fn platform(&self) -> Platform {
        Platform::Vercel
    }

    fn validate(&self) -> bool {
        tracing::info!("Validating Vercel deployment readiness...");
        super::run_validation_checks(
            Platform::Vercel,
            &[
                ("vercel.json configuration", self.has_vercel_json()),
                (
                    "API routes structure",
                    self.project_root.join("app.py").is_file(),
                ),
            ],
        )
    }

    fn prepare(&self) -> bool {
        tracing::info!("Preparing Vercel deployment...");
        if !self.has_vercel_json() {
            return super::write_template(
                &self.project_root,
                "vercel.json",
                &self.config_template(),
            );
        }
        true
    }

    fn deploy(&self) -> bool {
        tracing::info!("Deploying to Vercel...");
        tracing::info!("Use 'vercel' command to deploy");
        tracing::info!("Or push to your connected GitHub repository");
        true
    }

    fn config_template(&self) -> serde_json::Value {
        json!({
            "version": 2,
            "builds": [
                {
                    "src": "app.py",
                    "use": "@vercel/python"
                }
            ],
            "routes": [
                {
                    "src": "/(.*)",
                    "dest": "app.py"
                }
            ],
            "env": {
                "PYTHON_VERSION": "3.9"
            }
        })
    }

    fn rollback(&self, state: &DeploymentState) -> bool {
        tracing::info!("Triggering Vercel redeployment of restored snapshot {}...", state.id);
        tracing::info!("Run 'vercel --prod' or push the restored commit to your linked repository");
        self.deploy()
    }
}
