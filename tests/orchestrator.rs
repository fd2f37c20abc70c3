// ABOUTME: Integration tests for the deployment orchestrator state machine.
// ABOUTME: Uses fake checkers, migrators, and deployers to pin failure rules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use caravel::checks::{CheckResult, Checker, Severity};
use caravel::config::{DeployConfig, PlatformSpec};
use caravel::migrate::Migrator;
use caravel::orchestrator::Orchestrator;
use caravel::platform::{Platform, PlatformDeployer};
use caravel::snapshot::DeploymentState;

struct FakeChecker {
    pass: bool,
}

impl Checker for FakeChecker {
    fn check_all(&self) -> (bool, Vec<CheckResult>) {
        let result = CheckResult::system("Fake gate", self.pass, "", Severity::High);
        (self.pass, vec![result])
    }
}

struct FakeMigrator {
    ok: bool,
    calls: Arc<AtomicUsize>,
}

impl Migrator for FakeMigrator {
    fn run_migrations(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ok
    }
}

struct FakeDeployer {
    platform: Platform,
    deploy_ok: bool,
    deploy_calls: Arc<AtomicUsize>,
    rollback_calls: Arc<AtomicUsize>,
}

impl FakeDeployer {
    fn new(platform: Platform, deploy_ok: bool) -> Self {
        Self {
            platform,
            deploy_ok,
            deploy_calls: Arc::new(AtomicUsize::new(0)),
            rollback_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PlatformDeployer for FakeDeployer {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn validate(&self) -> bool {
        true
    }

    fn prepare(&self) -> bool {
        true
    }

    fn deploy(&self) -> bool {
        self.deploy_calls.fetch_add(1, Ordering::SeqCst);
        self.deploy_ok
    }

    fn config_template(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn rollback(&self, _state: &DeploymentState) -> bool {
        self.rollback_calls.fetch_add(1, Ordering::SeqCst);
        self.deploy_ok
    }
}

fn valid_config() -> DeployConfig {
    DeployConfig {
        platform: Some(PlatformSpec::One("render".into())),
        app_name: Some("demo".into()),
        extra: serde_json::Map::new(),
    }
}

/// Test: a failed migration is tolerated; deploy continues and checkpoints.
#[test]
fn migration_failure_does_not_abort_deploy() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.py"), "app\n").unwrap();

    let migration_calls = Arc::new(AtomicUsize::new(0));
    let deployer = FakeDeployer::new(Platform::Render, true);
    let deploy_calls = deployer.deploy_calls.clone();

    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_migrator(Box::new(FakeMigrator {
            ok: false,
            calls: migration_calls.clone(),
        }))
        .with_platform(Platform::Render, Box::new(deployer));

    assert!(orchestrator.deploy("render", true));
    assert_eq!(migration_calls.load(Ordering::SeqCst), 1);
    assert_eq!(deploy_calls.load(Ordering::SeqCst), 1);
    assert!(orchestrator.store().previous().is_some());
}

/// Test: a failing system gate aborts before any platform work.
#[test]
fn system_gate_failure_creates_no_checkpoint() {
    let dir = tempfile::tempdir().unwrap();

    let deployer = FakeDeployer::new(Platform::Render, true);
    let deploy_calls = deployer.deploy_calls.clone();

    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_system_checker(Box::new(FakeChecker { pass: false }))
        .with_platform(Platform::Render, Box::new(deployer));

    assert!(!orchestrator.deploy("render", true));
    assert_eq!(deploy_calls.load(Ordering::SeqCst), 0);
    assert!(orchestrator.store().previous().is_none());
}

/// Test: migrations are skipped entirely when the caller opts out.
#[test]
fn migrations_are_skipped_on_request() {
    let dir = tempfile::tempdir().unwrap();

    let migration_calls = Arc::new(AtomicUsize::new(0));
    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_migrator(Box::new(FakeMigrator {
            ok: true,
            calls: migration_calls.clone(),
        }))
        .with_platform(
            Platform::Render,
            Box::new(FakeDeployer::new(Platform::Render, true)),
        );

    assert!(orchestrator.deploy("render", false));
    assert_eq!(migration_calls.load(Ordering::SeqCst), 0);
}

/// Test: one platform's failure does not skip the remaining platforms.
#[test]
fn multi_platform_outcomes_are_independent() {
    let dir = tempfile::tempdir().unwrap();

    let failing = FakeDeployer::new(Platform::Render, false);
    let succeeding = FakeDeployer::new(Platform::Heroku, true);
    let render_calls = failing.deploy_calls.clone();
    let heroku_calls = succeeding.deploy_calls.clone();

    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_migrator(Box::new(FakeMigrator {
            ok: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }))
        .with_platform(Platform::Render, Box::new(failing))
        .with_platform(Platform::Heroku, Box::new(succeeding));

    let results =
        orchestrator.deploy_to_multiple(&["render".to_string(), "heroku".to_string()], false);

    assert!(!results["render"]);
    assert!(results["heroku"]);
    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
    assert_eq!(heroku_calls.load(Ordering::SeqCst), 1);
}

/// Test: an invalid config aborts deploy before touching the platform.
#[test]
fn invalid_config_blocks_deploy() {
    let dir = tempfile::tempdir().unwrap();

    let deployer = FakeDeployer::new(Platform::Render, true);
    let deploy_calls = deployer.deploy_calls.clone();

    let mut orchestrator = Orchestrator::new(dir.path(), DeployConfig::default())
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_platform(Platform::Render, Box::new(deployer));

    assert!(!orchestrator.deploy("render", false));
    assert_eq!(deploy_calls.load(Ordering::SeqCst), 0);
}

/// Test: the checkpoint records migrations, config, and checked gates.
#[test]
fn checkpoint_metadata_captures_the_session() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.py"), "app\n").unwrap();

    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_migrator(Box::new(FakeMigrator {
            ok: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }))
        .with_platform(
            Platform::Render,
            Box::new(FakeDeployer::new(Platform::Render, true)),
        );

    let (_, _) = orchestrator.check_readiness("flask");
    assert!(orchestrator.deploy("render", true));

    let state = orchestrator.store().previous().unwrap();
    assert_eq!(state.metadata["run_migrations"], serde_json::json!(true));
    let checked = state.metadata["checked_frameworks"].as_array().unwrap();
    assert!(checked.contains(&serde_json::json!("system")));
    assert!(checked.contains(&serde_json::json!("flask")));
    assert_eq!(
        state.metadata["config_snapshot"]["app_name"],
        serde_json::json!("demo")
    );
}

/// Test: rollback redeploys through the platform named in the checkpoint.
#[test]
fn rollback_redeploys_via_recorded_platform() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.py"), "app\n").unwrap();

    let deployer = FakeDeployer::new(Platform::Render, true);
    let rollback_calls = deployer.rollback_calls.clone();

    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_migrator(Box::new(FakeMigrator {
            ok: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }))
        .with_platform(Platform::Render, Box::new(deployer));

    assert!(orchestrator.deploy("render", false));
    assert!(orchestrator.rollback());
    assert_eq!(rollback_calls.load(Ordering::SeqCst), 1);
}

/// Test: strict mode re-runs a session framework gate and aborts on regress.
#[test]
fn strict_mode_rechecks_session_frameworks() {
    let dir = tempfile::tempdir().unwrap();

    let deployer = FakeDeployer::new(Platform::Render, true);
    let deploy_calls = deployer.deploy_calls.clone();

    let mut orchestrator = Orchestrator::new(dir.path(), valid_config())
        .with_strict(true)
        .with_system_checker(Box::new(FakeChecker { pass: true }))
        .with_checker(
            caravel::checks::Framework::Flask,
            Box::new(FakeChecker { pass: false }),
        )
        .with_platform(Platform::Render, Box::new(deployer));

    // The framework gate fails during readiness and again in strict deploy.
    let (ready, _) = orchestrator.check_readiness("flask");
    assert!(!ready);
    assert!(!orchestrator.deploy("render", false));
    assert_eq!(deploy_calls.load(Ordering::SeqCst), 0);
}
