// ABOUTME: Platform identifiers and the PlatformDeployer capability trait.
// ABOUTME: One deployer implementation per target PaaS provider.

mod heroku;
mod railway;
mod render;
mod vercel;

pub use heroku::HerokuDeployer;
pub use railway::RailwayDeployer;
pub use render::RenderDeployer;
pub use vercel::VercelDeployer;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::DeployConfig;
use crate::snapshot::DeploymentState;

/// Supported hosting platforms. The set is closed and small; deployers are
/// registered in a fixed table at startup, no dynamic plugin loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Platform {
    Render,
    Railway,
    Vercel,
    Heroku,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Render,
        Platform::Railway,
        Platform::Vercel,
        Platform::Heroku,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Render => "render",
            Platform::Railway => "railway",
            Platform::Vercel => "vercel",
            Platform::Heroku => "heroku",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "render" => Ok(Platform::Render),
            "railway" => Ok(Platform::Railway),
            "vercel" => Ok(Platform::Vercel),
            "heroku" => Ok(Platform::Heroku),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Platform-specific deploy behavior. Every provider follows the same
/// validate -> prepare -> deploy pattern with its own config format.
pub trait PlatformDeployer {
    fn platform(&self) -> Platform;

    /// Validate platform-specific requirements before deploying.
    fn validate(&self) -> bool;

    /// Generate missing config files and any other pre-deploy setup.
    fn prepare(&self) -> bool;

    /// Execute the deployment.
    fn deploy(&self) -> bool;

    /// Config file template for this platform.
    fn config_template(&self) -> serde_json::Value;

    /// Redeploy a restored snapshot. Providers without a dedicated rollback
    /// mechanism fall back to a plain redeploy.
    fn rollback(&self, state: &DeploymentState) -> bool {
        tracing::info!(
            "No custom rollback steps defined for {}; redeploying restored snapshot {}",
            self.platform(),
            state.id
        );
        self.deploy()
    }
}

/// Build the fixed platform registration table.
pub fn default_registry(
    project_root: &Path,
    config: &DeployConfig,
) -> BTreeMap<Platform, Box<dyn PlatformDeployer>> {
    let mut table: BTreeMap<Platform, Box<dyn PlatformDeployer>> = BTreeMap::new();
    table.insert(
        Platform::Render,
        Box::new(RenderDeployer::new(project_root.to_path_buf(), config.clone())),
    );
    table.insert(
        Platform::Railway,
        Box::new(RailwayDeployer::new(project_root.to_path_buf(), config.clone())),
    );
    table.insert(
        Platform::Vercel,
        Box::new(VercelDeployer::new(project_root.to_path_buf(), config.clone())),
    );
    table.insert(
        Platform::Heroku,
        Box::new(HerokuDeployer::new(project_root.to_path_buf(), config.clone())),
    );
    table
}

/// Write a platform config template to disk. YAML for `.yaml`/`.yml` targets,
/// pretty JSON otherwise.
pub(crate) fn write_template(
    project_root: &Path,
    file_name: &str,
    template: &serde_json::Value,
) -> bool {
    let path: PathBuf = project_root.join(file_name);
    let rendered = if file_name.ends_with(".yaml") || file_name.ends_with(".yml") {
        serde_yaml::to_string(template).map_err(|e| e.to_string())
    } else {
        serde_json::to_string_pretty(template).map_err(|e| e.to_string())
    };

    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!("Error generating config file: {e}");
            return false;
        }
    };

    match std::fs::write(&path, rendered) {
        Ok(()) => {
            tracing::info!("Configuration file generated: {file_name}");
            true
        }
        Err(e) => {
            tracing::error!("Error generating config file: {e}");
            false
        }
    }
}

/// Log the outcome of a list of named validation probes; true only when all
/// pass. Shared by the per-platform validate implementations.
pub(crate) fn run_validation_checks(platform: Platform, checks: &[(&str, bool)]) -> bool {
    let mut all_valid = true;
    for (description, passed) in checks {
        if *passed {
            tracing::info!("✓ {description} check passed");
        } else {
            tracing::warn!("✗ {description} check failed for {platform}");
            all_valid = false;
        }
    }
    all_valid
}
