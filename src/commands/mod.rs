// ABOUTME: Command module aggregator for the caravel CLI.
// ABOUTME: Re-exports check, run, rollback, and info command handlers.

mod check;
mod info;
mod rollback;
mod run;

pub use check::check;
pub use info::info;
pub use rollback::rollback;
pub use run::{run, RunArgs};

use std::path::Path;

use caravel::checks::Framework;

/// Guess the project framework from its files. Django's manage.py is the
/// strongest signal; shared entry points (app.py, main.py) default to Flask,
/// so FastAPI projects should pass --framework explicitly.
pub fn detect_framework(project_root: &Path) -> Option<Framework> {
    if project_root.join("manage.py").is_file() {
        return Some(Framework::Django);
    }

    let flask_files = ["app.py", "wsgi.py", "main.py"];
    if flask_files
        .iter()
        .any(|name| project_root.join(name).is_file())
    {
        return Some(Framework::Flask);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_py_wins_over_app_py() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manage.py"), "").unwrap();
        std::fs::write(dir.path().join("app.py"), "").unwrap();

        assert_eq!(detect_framework(dir.path()), Some(Framework::Django));
    }

    #[test]
    fn wsgi_py_detects_flask() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wsgi.py"), "").unwrap();

        assert_eq!(detect_framework(dir.path()), Some(Framework::Flask));
    }

    #[test]
    fn empty_project_detects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(detect_framework(dir.path()), None);
    }
}
