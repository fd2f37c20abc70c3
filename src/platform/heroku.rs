// ABOUTME: Heroku deployer.
// ABOUTME: Procfile-driven platform; prepare creates a default Procfile.

use std::path::PathBuf;

use serde_json::json;

use crate::config::DeployConfig;
use crate::snapshot::DeploymentState;

use super::{Platform, PlatformDeployer};

const DEFAULT_PROCFILE: &str = "web: python app.py";

pub struct HerokuDeployer {
    project_root: PathBuf,
    #[allow(dead_code)]
    config: DeployConfig,
}

impl HerokuDeployer {
    pub fn new(project_root: PathBuf, config: DeployConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    fn has_procfile(&self) -> bool {
        self.project_root.join("Procfile").is_file()
    }
}

impl PlatformDeployer for HerokuDeployer {
    fn platform(&self) -> Platform {
        Platform::Heroku
    }

    fn validate(&self) -> bool {
        tracing::info!("Validating Heroku deployment readiness...");
        super::run_validation_checks(
            Platform::Heroku,
            &[
                ("Procfile", self.has_procfile()),
                (
                    "requirements.txt",
                    self.project_root.join("requirements.txt").is_file(),
                ),
            ],
        )
    }

    fn prepare(&self) -> bool {
        tracing::info!("Preparing Heroku deployment...");
        if !self.has_procfile() {
            match std::fs::write(self.project_root.join("Procfile"), DEFAULT_PROCFILE) {
                Ok(()) => tracing::info!("Procfile created"),
                Err(e) => {
                    tracing::error!("Unable to create Procfile: {e}");
                    return false;
                }
            }
        }
        true
    }

    fn deploy(&self) -> bool {
        tracing::info!("Deploying to Heroku...");
        tracing::info!("Use 'heroku deploy' or 'git push heroku main'");
        true
    }

    fn config_template(&self) -> serde_json::Value {
        json!({
            "procfile": DEFAULT_PROCFILE,
        })
    }

    fn rollback(&self, state: &DeploymentState) -> bool {
        tracing::info!("Redeploying snapshot {} to Heroku...", state.id);
        tracing::info!("Run 'heroku releases:rollback' if you maintain releases on Heroku");
        self.deploy()
    }
}
