// ABOUTME: Rollback command implementation.
// ABOUTME: Restores the previous checkpoint and triggers a platform redeploy.

use std::path::Path;

use caravel::error::{Error, Result};
use caravel::orchestrator::Orchestrator;
use caravel::output::Output;

/// Rollback to the previous deployment checkpoint.
pub fn rollback(project_root: &Path, mut output: Output) -> Result<()> {
    output.start_timer();
    output.progress("Rolling back to previous deployment...");

    let orchestrator = Orchestrator::discover(project_root)?;
    if orchestrator.rollback() {
        output.success("Rollback successful");
        Ok(())
    } else {
        output.error("Rollback failed");
        Err(Error::RollbackFailed)
    }
}
