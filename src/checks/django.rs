// ABOUTME: Django deployment readiness checker.
// ABOUTME: Inspects settings.py for production hardening and manage.py.

use std::path::PathBuf;

use super::{CheckResult, Checker};

const SECURITY_SETTINGS: &[&str] = &[
    "SECURE_SSL_REDIRECT",
    "SESSION_COOKIE_SECURE",
    "CSRF_COOKIE_SECURE",
];

/// Check Django application readiness for production deployment.
pub struct DjangoChecker {
    project_root: PathBuf,
}

impl DjangoChecker {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// settings.py lives either under config/ or at the project root.
    fn settings_source(&self) -> Option<String> {
        super::read_if_present(&self.project_root.join("config").join("settings.py"))
            .or_else(|| super::read_if_present(&self.project_root.join("settings.py")))
    }

    fn check_manage_py(&self) -> CheckResult {
        let found = self.project_root.join("manage.py").is_file();
        CheckResult::framework(
            "Django manage.py",
            found,
            if found {
                "manage.py found"
            } else {
                "manage.py not found"
            },
        )
    }

    fn check_settings_security(&self) -> CheckResult {
        if let Some(content) = self.settings_source() {
            let found = SECURITY_SETTINGS
                .iter()
                .filter(|s| content.contains(**s))
                .count();
            if found >= 2 {
                return CheckResult::framework(
                    "Settings security",
                    true,
                    format!("Found {found} security settings"),
                );
            }
        }
        CheckResult::framework(
            "Settings security",
            false,
            "Production security settings not fully configured",
        )
    }

    fn check_static_files(&self) -> CheckResult {
        if let Some(content) = self.settings_source()
            && (content.contains("STATIC_ROOT") || content.contains("STATICFILES_STORAGE"))
        {
            return CheckResult::framework("Static files", true, "Static files are configured");
        }
        CheckResult::framework(
            "Static files",
            false,
            "Static files configuration not found",
        )
    }

    fn check_database_config(&self) -> CheckResult {
        if let Some(content) = self.settings_source()
            && content.contains("DATABASES")
        {
            return CheckResult::framework(
                "Database configuration",
                true,
                "Database is configured",
            );
        }
        CheckResult::framework(
            "Database configuration",
            false,
            "Database configuration not found",
        )
    }

    fn check_secret_key(&self) -> CheckResult {
        if let Some(content) = self.settings_source()
            && content.contains("SECRET_KEY")
        {
            return CheckResult::framework("Secret key", true, "SECRET_KEY is configured");
        }
        CheckResult::framework("Secret key", false, "SECRET_KEY configuration not found")
    }

    fn check_allowed_hosts(&self) -> CheckResult {
        if let Some(content) = self.settings_source()
            && content.contains("ALLOWED_HOSTS")
        {
            return CheckResult::framework("ALLOWED_HOSTS", true, "ALLOWED_HOSTS is configured");
        }
        CheckResult::framework(
            "ALLOWED_HOSTS",
            false,
            "ALLOWED_HOSTS not configured (required for production)",
        )
    }

    fn check_debug_mode(&self) -> CheckResult {
        if let Some(content) = self.settings_source()
            && (content.contains("DEBUG = False")
                || (content.contains("DEBUG") && content.contains("os.environ")))
        {
            return CheckResult::framework("Debug mode", true, "DEBUG is properly configured");
        }
        CheckResult::framework(
            "Debug mode",
            false,
            "DEBUG mode not properly configured for production",
        )
    }
}

impl Checker for DjangoChecker {
    fn check_all(&self) -> (bool, Vec<CheckResult>) {
        tracing::info!("Checking Django application readiness...");
        let results = vec![
            super::check_requirements_file(&self.project_root),
            self.check_manage_py(),
            self.check_settings_security(),
            super::check_environment_config(&self.project_root),
            self.check_static_files(),
            self.check_database_config(),
            self.check_secret_key(),
            self.check_allowed_hosts(),
            self.check_debug_mode(),
        ];
        let all_passed = results.iter().all(|r| r.passed);
        (all_passed, results)
    }
}
