// ABOUTME: Check command implementation.
// ABOUTME: Runs system and framework readiness gates and prints the results.

use std::path::Path;

use caravel::error::{Error, Result};
use caravel::orchestrator::Orchestrator;
use caravel::output::Output;

/// Run readiness checks for the given (or auto-detected) framework.
pub fn check(project_root: &Path, framework: Option<String>, mut output: Output) -> Result<()> {
    let framework = match framework {
        Some(name) => name,
        None => match super::detect_framework(project_root) {
            Some(detected) => {
                output.progress(&format!("Detected framework: {detected}"));
                detected.as_str().to_string()
            }
            None => return Err(Error::FrameworkNotDetected),
        },
    };

    output.start_timer();
    output.progress(&format!("Analyzing {framework} application readiness..."));

    let mut orchestrator = Orchestrator::discover(project_root)?;
    let (ready, results) = orchestrator.check_readiness(&framework);

    for result in &results {
        output.check_result(result);
    }

    if ready {
        output.success("Application is ready for deployment");
        Ok(())
    } else {
        let failures = results.iter().filter(|r| !r.passed).count();
        output.error(&format!("{failures} issue(s) found - fix before deploying"));
        Err(Error::NotReady)
    }
}
