// ABOUTME: Run command implementation.
// ABOUTME: Deploys to one or many platforms with optional migrations.

use std::path::Path;

use caravel::config::PlatformSpec;
use caravel::error::{Error, Result};
use caravel::orchestrator::Orchestrator;
use caravel::output::Output;

pub struct RunArgs {
    pub platform: Option<String>,
    pub multi: Vec<String>,
    pub no_migrations: bool,
    pub strict: bool,
}

/// Deploy the application. The platform comes from the CLI flag, then the
/// config file; `--multi` deploys to several platforms in sequence.
pub fn run(project_root: &Path, args: RunArgs, mut output: Output) -> Result<()> {
    let mut orchestrator = Orchestrator::discover(project_root)?.with_strict(args.strict);
    let run_migrations = !args.no_migrations;

    let targets = resolve_targets(&args, &orchestrator)?;
    if targets.is_empty() {
        return Err(Error::NoPlatform);
    }
    output.start_timer();

    if targets.len() > 1 {
        output.progress(&format!("Deploying to: {}", targets.join(", ")));
        let results = orchestrator.deploy_to_multiple(&targets, run_migrations);

        let mut all_ok = true;
        for (platform, success) in &results {
            let icon = if *success { "✓" } else { "✗" };
            output.progress(&format!(
                "{icon} {platform} [{}]",
                if *success { "SUCCESS" } else { "FAILED" }
            ));
            all_ok &= success;
        }

        if all_ok {
            output.success("All deployments completed");
            Ok(())
        } else {
            let failed: Vec<&str> = results
                .iter()
                .filter(|(_, ok)| !**ok)
                .map(|(name, _)| name.as_str())
                .collect();
            output.error(&format!("Deployment failed for: {}", failed.join(", ")));
            Err(Error::DeploymentFailed(failed.join(", ")))
        }
    } else {
        let platform = &targets[0];
        output.progress(&format!("Deploying to {platform}..."));

        if orchestrator.deploy(platform, run_migrations) {
            output.success(&format!("Deployment completed for {platform}"));
            Ok(())
        } else {
            output.error(&format!("Deployment failed for {platform}"));
            Err(Error::DeploymentFailed(platform.clone()))
        }
    }
}

fn resolve_targets(args: &RunArgs, orchestrator: &Orchestrator) -> Result<Vec<String>> {
    if !args.multi.is_empty() {
        return Ok(args.multi.clone());
    }
    if let Some(platform) = &args.platform {
        return Ok(vec![platform.clone()]);
    }
    match &orchestrator.config().platform {
        Some(PlatformSpec::One(name)) => Ok(vec![name.clone()]),
        Some(PlatformSpec::Many(names)) => Ok(names.clone()),
        None => Err(Error::NoPlatform),
    }
}
