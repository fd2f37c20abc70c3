// ABOUTME: Flask deployment readiness checker.
// ABOUTME: Inspects entry points, secrets, debug mode, and error handlers.

use std::path::PathBuf;

use super::{CheckResult, Checker};

const ENTRY_POINTS: &[&str] = &["app.py", "wsgi.py", "main.py"];

/// Check whether a Flask application is production-ready.
pub struct FlaskChecker {
    project_root: PathBuf,
}

impl FlaskChecker {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    fn app_source(&self) -> Option<String> {
        super::read_if_present(&self.project_root.join("app.py"))
    }

    fn check_entry_point(&self) -> CheckResult {
        match super::first_existing(&self.project_root, ENTRY_POINTS) {
            Some(found) => {
                CheckResult::framework("Flask app entry point", true, format!("{found} found"))
            }
            None => CheckResult::framework(
                "Flask app entry point",
                false,
                "app.py, wsgi.py, or main.py not found",
            ),
        }
    }

    fn check_wsgi_app(&self) -> CheckResult {
        if let Some(content) = super::read_if_present(&self.project_root.join("wsgi.py"))
            && (content.contains("application") || content.contains("app"))
        {
            return CheckResult::framework(
                "WSGI application",
                true,
                "WSGI application found in wsgi.py",
            );
        }
        CheckResult::framework(
            "WSGI application",
            false,
            "WSGI application not properly configured",
        )
    }

    fn check_secret_key(&self) -> CheckResult {
        if let Some(content) = self.app_source()
            && (content.contains("SECRET_KEY") || content.contains("secret_key"))
        {
            return CheckResult::framework("Secret key", true, "SECRET_KEY is configured");
        }
        CheckResult::framework(
            "Secret key",
            false,
            "SECRET_KEY should be configured for security",
        )
    }

    fn check_database_config(&self) -> CheckResult {
        if let Some(content) = self.app_source()
            && (content.contains("SQLAlchemy")
                || content.contains("DATABASE")
                || content.contains("db"))
        {
            return CheckResult::framework(
                "Database configuration",
                true,
                "Database appears to be configured",
            );
        }
        CheckResult::framework(
            "Database configuration",
            false,
            "Database configuration not clearly found (may be optional)",
        )
    }

    fn check_debug_mode(&self) -> CheckResult {
        match self.app_source() {
            Some(content) if content.contains("debug=True") => CheckResult::framework(
                "Debug mode",
                false,
                "debug=True found in app.run(). Use environment variable instead.",
            ),
            Some(_) => CheckResult::framework("Debug mode", true, "Debug mode not hardcoded"),
            None => CheckResult::framework(
                "Debug mode",
                false,
                "Could not verify debug mode configuration",
            ),
        }
    }

    fn check_error_handlers(&self) -> CheckResult {
        if let Some(content) = self.app_source()
            && content.contains("@app.errorhandler")
        {
            return CheckResult::framework("Error handlers", true, "Error handlers are configured");
        }
        CheckResult::framework(
            "Error handlers",
            false,
            "Error handlers recommended for production",
        )
    }
}

impl Checker for FlaskChecker {
    fn check_all(&self) -> (bool, Vec<CheckResult>) {
        tracing::info!("Checking Flask application readiness...");
        let results = vec![
            super::check_requirements_file(&self.project_root),
            self.check_entry_point(),
            self.check_wsgi_app(),
            super::check_environment_config(&self.project_root),
            self.check_secret_key(),
            self.check_database_config(),
            self.check_debug_mode(),
            self.check_error_handlers(),
        ];
        let all_passed = results.iter().all(|r| r.passed);
        (all_passed, results)
    }
}
