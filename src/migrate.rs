// ABOUTME: Database migration step run between validation and deploy.
// ABOUTME: Detects Django or Alembic projects and shells out to their tools.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Migration tooling detected in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationTool {
    Django,
    Alembic,
}

/// Runs schema migrations. A failed migration never aborts a deployment;
/// callers log the failure and continue.
pub trait Migrator {
    fn run_migrations(&self) -> bool;
}

pub struct DatabaseMigrator {
    project_root: PathBuf,
}

impl DatabaseMigrator {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Django wins over Alembic when both are present: manage.py is the
    /// stronger signal of how the project is actually operated.
    pub fn detect_tool(&self) -> Option<MigrationTool> {
        if self.project_root.join("manage.py").is_file() {
            return Some(MigrationTool::Django);
        }

        if let Ok(content) = std::fs::read_to_string(self.project_root.join("requirements.txt"))
            && content.to_lowercase().contains("alembic")
        {
            return Some(MigrationTool::Alembic);
        }

        None
    }

    fn run_django(&self) -> bool {
        tracing::info!("Running Django migrations...");
        run_tool(&self.project_root, "python", &["manage.py", "migrate"], "Django migrations")
    }

    fn run_alembic(&self) -> bool {
        tracing::info!("Running Alembic migrations...");
        if !self.project_root.join("migrations").is_dir() {
            tracing::warn!("Migrations directory not found");
            return false;
        }
        run_tool(&self.project_root, "alembic", &["upgrade", "head"], "Alembic migrations")
    }
}

impl Migrator for DatabaseMigrator {
    fn run_migrations(&self) -> bool {
        match self.detect_tool() {
            Some(MigrationTool::Django) => self.run_django(),
            Some(MigrationTool::Alembic) => self.run_alembic(),
            None => {
                tracing::info!("No standard migrations framework detected");
                true
            }
        }
    }
}

fn run_tool(cwd: &Path, program: &str, args: &[&str], label: &str) -> bool {
    match Command::new(program).args(args).current_dir(cwd).output() {
        Ok(output) if output.status.success() => {
            tracing::info!("{label} completed successfully");
            true
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("{label} failed: {}", stderr.trim());
            false
        }
        Err(e) => {
            tracing::error!("Error running {label}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_py_selects_django() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manage.py"), "").unwrap();

        let migrator = DatabaseMigrator::new(dir.path().to_path_buf());
        assert_eq!(migrator.detect_tool(), Some(MigrationTool::Django));
    }

    #[test]
    fn alembic_detected_from_requirements() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "Alembic==1.13\n").unwrap();

        let migrator = DatabaseMigrator::new(dir.path().to_path_buf());
        assert_eq!(migrator.detect_tool(), Some(MigrationTool::Alembic));
    }

    #[test]
    fn django_takes_precedence_over_alembic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manage.py"), "").unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "alembic\n").unwrap();

        let migrator = DatabaseMigrator::new(dir.path().to_path_buf());
        assert_eq!(migrator.detect_tool(), Some(MigrationTool::Django));
    }

    #[test]
    fn no_tooling_means_migrations_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let migrator = DatabaseMigrator::new(dir.path().to_path_buf());
        assert_eq!(migrator.detect_tool(), None);
        assert!(migrator.run_migrations());
    }

    #[test]
    fn alembic_without_migrations_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "alembic\n").unwrap();

        let migrator = DatabaseMigrator::new(dir.path().to_path_buf());
        assert!(!migrator.run_migrations());
    }
}
