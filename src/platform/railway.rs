// ABOUTME: Railway.app deployer.
// ABOUTME: Validates railway.json and Procfile or a configured start command.

use std::path::PathBuf;

use serde_json::json;

use crate::config::DeployConfig;
use crate::snapshot::DeploymentState;

use super::{Platform, PlatformDeployer};

pub struct RailwayDeployer {
    project_root: PathBuf,
    config: DeployConfig,
}

impl RailwayDeployer {
    pub fn new(project_root: PathBuf, config: DeployConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    fn has_railway_config(&self) -> bool {
        self.project_root.join("railway.json").is_file()
            || self.project_root.join("railway.yaml").is_file()
    }

    fn has_start_command(&self) -> bool {
        self.project_root.join("Procfile").is_file()
            || self.config.extra.contains_key("start_command")
    }
}

impl PlatformDeployer for RailwayDeployer {
    fn platform(&self) -> Platform {
        Platform::Railway
    }

    fn validate(&self) -> bool {
        tracing::info!("Validating Railway deployment readiness...");
        super::run_validation_checks(
            Platform::Railway,
            &[
                ("Railway configuration", self.has_railway_config()),
                ("Procfile or start command", self.has_start_command()),
            ],
        )
    }

    fn prepare(&self) -> bool {
        tracing::info!("Preparing Railway deployment...");
        if !self.project_root.join("railway.json").is_file() {
            return super::write_template(
                &self.project_root,
                "railway.json",
                &self.config_template(),
            );
        }
        true
    }

    fn deploy(&self) -> bool {
        tracing::info!("Deploying to Railway...");
        tracing::info!("Use 'railway up' command to deploy");
        tracing::info!("Or push to your connected version control system");
        true
    }

    fn config_template(&self) -> serde_json::Value {
        json!({
            "$schema": "https://railway.app/railway.schema.json",
            "build": {
                "builder": "dockerfile"
            },
            "deploy": {
                "startCommand": "python app.py",
                "restartPolicyType": "on_failure",
                "restartPolicyMaxRetries": 5
            }
        })
    }

    fn rollback(&self, state: &DeploymentState) -> bool {
        tracing::info!("Triggering Railway rollback by redeploying snapshot {}...", state.id);
        tracing::info!("Run 'railway up' to redeploy or push restored code to your repo");
        self.deploy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_in_config_satisfies_procfile_check() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DeployConfig::default();
        config
            .extra
            .insert("start_command".into(), serde_json::json!("python app.py"));

        let deployer = RailwayDeployer::new(dir.path().to_path_buf(), config);
        assert!(deployer.has_start_command());
    }

    #[test]
    fn prepare_writes_railway_json() {
        let dir = tempfile::tempdir().unwrap();
        let deployer = RailwayDeployer::new(dir.path().to_path_buf(), DeployConfig::default());

        assert!(deployer.prepare());
        let content = std::fs::read_to_string(dir.path().join("railway.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["deploy"]["restartPolicyMaxRetries"], 5);
    }

    #[test]
    fn yaml_variant_counts_as_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("railway.yaml"), "build: {}\n").unwrap();

        let deployer = RailwayDeployer::new(dir.path().to_path_buf(), DeployConfig::default());
        assert!(deployer.has_railway_config());
    }
}
