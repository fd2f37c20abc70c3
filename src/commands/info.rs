// ABOUTME: Info command implementation.
// ABOUTME: Shows detected framework, config, and deployment history state.

use std::path::Path;

use caravel::checks::Framework;
use caravel::config::DeployConfig;
use caravel::error::Result;
use caravel::output::Output;
use caravel::platform::Platform;
use caravel::snapshot::SnapshotStore;

const COMMON_FILES: &[&str] = &[
    "app.py",
    "manage.py",
    "wsgi.py",
    "requirements.txt",
    ".env",
];

/// Display project deployment information.
pub fn info(project_root: &Path, output: Output) -> Result<()> {
    let config = DeployConfig::discover(project_root)?;

    output.progress(&format!("Project: {}", project_root.display()));

    let framework = super::detect_framework(project_root);
    output.progress(&format!(
        "Detected framework: {}",
        framework.map_or_else(|| "unknown".to_string(), |f| f.to_string())
    ));

    match &config.platform {
        Some(spec) => output.progress(&format!("Configured platform: {spec}")),
        None => output.progress("Configured platform: none"),
    }
    if let Some(app_name) = &config.app_name {
        output.progress(&format!("App name: {app_name}"));
    }

    output.progress("Files:");
    for name in COMMON_FILES {
        let icon = if project_root.join(name).is_file() {
            "✓"
        } else {
            "✗"
        };
        output.progress(&format!("  {icon} {name}"));
    }

    let store = SnapshotStore::new(project_root);
    match store.previous() {
        Some(state) => output.progress(&format!(
            "Last checkpoint: {} ({} at {})",
            state.id, state.platform, state.timestamp
        )),
        None => output.progress("Last checkpoint: none"),
    }

    output.progress(&format!(
        "Available platforms: {}",
        Platform::ALL.map(|p| p.as_str()).join(", ")
    ));
    output.progress(&format!(
        "Available checkers: {}",
        Framework::ALL.map(|f| f.as_str()).join(", ")
    ));

    Ok(())
}
