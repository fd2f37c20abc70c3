// ABOUTME: Central deployment coordinator tying gates, platforms, migrations,
// ABOUTME: and checkpoints together. All failures resolve to booleans plus logs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::checks::{default_checkers, CheckResult, Checker, Framework, SystemChecker};
use crate::config::{self, ConfigError, DeployConfig};
use crate::migrate::{DatabaseMigrator, Migrator};
use crate::platform::{default_registry, Platform, PlatformDeployer};
use crate::rollback::rollback_to_previous;
use crate::snapshot::{DeploymentState, MetaValue, SnapshotStore};

/// Orchestrates the whole deployment lifecycle: readiness gates, config
/// validation, platform deploy, migrations, checkpointing, and rollback.
pub struct Orchestrator {
    project_root: PathBuf,
    config: DeployConfig,
    platforms: BTreeMap<Platform, Box<dyn PlatformDeployer>>,
    checkers: BTreeMap<Framework, Box<dyn Checker>>,
    system: Box<dyn Checker>,
    migrator: Box<dyn Migrator>,
    store: SnapshotStore,
    strict: bool,
    // Gates validated during this session, by name ("system" or a framework).
    checked: BTreeSet<String>,
}

impl Orchestrator {
    /// Build an orchestrator with the default component set.
    pub fn new(project_root: impl Into<PathBuf>, config: DeployConfig) -> Self {
        let project_root = project_root.into();
        let platforms = default_registry(&project_root, &config);
        let checkers = default_checkers(&project_root);
        let system = Box::new(SystemChecker::new(project_root.clone()));
        let migrator = Box::new(DatabaseMigrator::new(project_root.clone()));
        let store = SnapshotStore::new(project_root.clone());

        tracing::info!("Deployer initialized for project: {}", project_root.display());

        Self {
            project_root,
            config,
            platforms,
            checkers,
            system,
            migrator,
            store,
            strict: false,
            checked: BTreeSet::new(),
        }
    }

    /// Discover the deployment config under `project_root` and build the
    /// orchestrator around it.
    pub fn discover(project_root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let project_root = project_root.into();
        let config = DeployConfig::discover(&project_root)?;
        Ok(Self::new(project_root, config))
    }

    /// Re-run every framework gate already validated this session during
    /// deploy, instead of trusting the earlier result.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_system_checker(mut self, checker: Box<dyn Checker>) -> Self {
        self.system = checker;
        self
    }

    pub fn with_migrator(mut self, migrator: Box<dyn Migrator>) -> Self {
        self.migrator = migrator;
        self
    }

    pub fn with_platform(mut self, platform: Platform, deployer: Box<dyn PlatformDeployer>) -> Self {
        self.platforms.insert(platform, deployer);
        self
    }

    pub fn with_checker(mut self, framework: Framework, checker: Box<dyn Checker>) -> Self {
        self.checkers.insert(framework, checker);
        self
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn project_root(&self) -> &PathBuf {
        &self.project_root
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    fn run_system_gate(&mut self) -> (bool, Vec<CheckResult>) {
        let (ready, results) = self.system.check_all();
        self.checked.insert("system".to_string());
        (ready, results)
    }

    /// Run the system gate plus the framework-specific gate. An unknown
    /// framework name fails with only the system results attached.
    pub fn check_readiness(&mut self, framework: &str) -> (bool, Vec<CheckResult>) {
        let (system_ready, mut results) = self.run_system_gate();

        let parsed: Framework = match framework.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("{e}");
                return (false, results);
            }
        };

        let Some(checker) = self.checkers.get(&parsed) else {
            tracing::error!("No checker registered for framework: {parsed}");
            return (false, results);
        };

        let (framework_ready, framework_results) = checker.check_all();
        self.checked.insert(parsed.as_str().to_string());
        results.extend(framework_results);
        (system_ready && framework_ready, results)
    }

    /// Validate the config schema and the platform's own requirements.
    pub fn validate_deployment(&self, platform: &str) -> bool {
        let (is_valid, errors) = config::validate(&self.config);
        if !is_valid {
            tracing::error!("Configuration validation failed: {errors:?}");
            return false;
        }

        let Some(deployer) = self.deployer_for(platform) else {
            return false;
        };

        if !deployer.validate() {
            tracing::error!("Validation failed for {platform}");
            return false;
        }

        tracing::info!("✓ Validation passed for {platform}");
        true
    }

    /// Generate any missing platform config files.
    pub fn prepare_deployment(&self, platform: &str) -> bool {
        let Some(deployer) = self.deployer_for(platform) else {
            return false;
        };

        if !deployer.prepare() {
            tracing::error!("Preparation failed for {platform}");
            return false;
        }

        tracing::info!("✓ Preparation completed for {platform}");
        true
    }

    /// Deploy to one platform. Never panics or propagates errors; every
    /// failure path resolves to `false` with log output.
    pub fn deploy(&mut self, platform: &str, run_migrations: bool) -> bool {
        tracing::info!("Starting deployment to {platform}...");

        let (system_ready, system_results) = self.run_system_gate();
        if !system_ready {
            tracing::error!("Critical system checks failed; aborting deployment");
            for result in system_results.iter().filter(|r| !r.passed) {
                tracing::error!("  - {}: {}", result.name, result.message);
            }
            return false;
        }

        if self.strict && !self.recheck_session_frameworks() {
            return false;
        }

        if !self.validate_deployment(platform) {
            tracing::error!("Deployment validation failed");
            return false;
        }

        if !self.prepare_deployment(platform) {
            return false;
        }

        if run_migrations {
            tracing::info!("Running database migrations...");
            if !self.migrator.run_migrations() {
                // Tolerated: a failed migration often leaves the app servable.
                tracing::warn!("Migrations failed, but continuing with deployment");
            }
        }

        let Some(deployer) = self.deployer_for(platform) else {
            return false;
        };
        if !deployer.deploy() {
            tracing::error!("Deployment failed for {platform}");
            return false;
        }
        tracing::info!("✓ Deployment completed for {platform}");

        let mut metadata = BTreeMap::new();
        metadata.insert("run_migrations".to_string(), MetaValue::from(run_migrations));
        metadata.insert(
            "config_snapshot".to_string(),
            MetaValue::from_json(self.config.to_json()),
        );
        metadata.insert(
            "checked_frameworks".to_string(),
            MetaValue::from(
                self.checked
                    .iter()
                    .map(|name| MetaValue::from(name.as_str()))
                    .collect::<Vec<_>>(),
            ),
        );

        match self.store.create_checkpoint(platform, metadata) {
            Ok(state) => {
                tracing::info!("Checkpoint recorded: {}", state.id);
                true
            }
            Err(e) => {
                tracing::error!("Deployment succeeded but checkpoint failed: {e}");
                false
            }
        }
    }

    /// Deploy to each platform in order. Outcomes are independent; one
    /// failure never skips the remaining platforms.
    pub fn deploy_to_multiple(
        &mut self,
        platforms: &[String],
        run_migrations: bool,
    ) -> BTreeMap<String, bool> {
        let mut results = BTreeMap::new();
        for platform in platforms {
            tracing::info!("Deploying to {platform}...");
            results.insert(platform.clone(), self.deploy(platform, run_migrations));
        }
        results
    }

    /// Restore the most recent checkpoint and redeploy it through the
    /// platform recorded in the checkpoint.
    pub fn rollback(&self) -> bool {
        let redeploy = |state: &DeploymentState| -> bool {
            let parsed: Platform = match state.platform.parse() {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::error!("Rollback state has no usable platform: {e}");
                    return false;
                }
            };
            match self.platforms.get(&parsed) {
                Some(deployer) => deployer.rollback(state),
                None => {
                    tracing::error!("No deployer registered for platform: {parsed}");
                    false
                }
            }
        };
        rollback_to_previous(&self.store, Some(&redeploy))
    }

    fn deployer_for(&self, platform: &str) -> Option<&dyn PlatformDeployer> {
        let parsed: Platform = match platform.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("{e}");
                return None;
            }
        };
        let deployer = self.platforms.get(&parsed).map(Box::as_ref);
        if deployer.is_none() {
            tracing::error!("No deployer registered for platform: {parsed}");
        }
        deployer
    }

    fn recheck_session_frameworks(&self) -> bool {
        for name in &self.checked {
            let Ok(framework) = name.parse::<Framework>() else {
                continue;
            };
            let Some(checker) = self.checkers.get(&framework) else {
                continue;
            };
            let (ready, results) = checker.check_all();
            if !ready {
                tracing::error!("Strict mode: {framework} readiness regressed; aborting");
                for result in results.iter().filter(|r| !r.passed) {
                    tracing::error!("  - {}: {}", result.name, result.message);
                }
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeployConfig {
            platform: Some(crate::config::PlatformSpec::One("render".into())),
            app_name: Some("demo".into()),
            extra: serde_json::Map::new(),
        };
        let orchestrator = Orchestrator::new(dir.path(), config);
        assert!(!orchestrator.validate_deployment("fly"));
    }

    #[test]
    fn invalid_config_blocks_validation_before_platform_checks() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(dir.path(), DeployConfig::default());
        assert!(!orchestrator.validate_deployment("render"));
    }

    #[test]
    fn unknown_framework_returns_only_system_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut orchestrator = Orchestrator::new(dir.path(), DeployConfig::default());

        let (ready, results) = orchestrator.check_readiness("rails");
        assert!(!ready);
        assert!(results
            .iter()
            .all(|r| r.category == crate::checks::Category::System));
    }
}
