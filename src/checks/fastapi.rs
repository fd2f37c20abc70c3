// ABOUTME: FastAPI deployment readiness checker.
// ABOUTME: Inspects the ASGI entry point, CORS, middleware, and handlers.

use std::path::PathBuf;

use super::{CheckResult, Checker};

const ENTRY_POINTS: &[&str] = &["app.py", "main.py"];

/// Check FastAPI application readiness for production deployment.
pub struct FastApiChecker {
    project_root: PathBuf,
}

impl FastApiChecker {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// First entry-point source that exists, if any.
    fn entry_sources(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        ENTRY_POINTS.iter().filter_map(|name| {
            super::read_if_present(&self.project_root.join(name)).map(|content| (*name, content))
        })
    }

    fn source_contains(&self, needles: &[&str]) -> bool {
        self.entry_sources()
            .any(|(_, content)| needles.iter().any(|n| content.contains(n)))
    }

    fn check_app(&self) -> CheckResult {
        for (name, content) in self.entry_sources() {
            if content.contains("FastAPI") {
                return CheckResult::framework(
                    "FastAPI application",
                    true,
                    format!("FastAPI app found in {name}"),
                );
            }
        }
        CheckResult::framework(
            "FastAPI application",
            false,
            "FastAPI application not found in app.py or main.py",
        )
    }

    fn check_asgi_server(&self) -> CheckResult {
        if let Some(content) = super::read_if_present(&self.project_root.join("requirements.txt"))
            && (content.contains("uvicorn") || content.contains("gunicorn"))
        {
            return CheckResult::framework(
                "Uvicorn/Gunicorn",
                true,
                "Production ASGI server found in requirements",
            );
        }
        CheckResult::framework(
            "Uvicorn/Gunicorn",
            false,
            "Production ASGI server (uvicorn or gunicorn) not in requirements",
        )
    }

    fn check_cors(&self) -> CheckResult {
        if self.source_contains(&["CORSMiddleware", "cors"]) {
            return CheckResult::framework("CORS configuration", true, "CORS is configured");
        }
        CheckResult::framework(
            "CORS configuration",
            false,
            "CORS should be configured for production APIs",
        )
    }

    fn check_middleware(&self) -> CheckResult {
        if self.source_contains(&["middleware", "@app.middleware"]) {
            return CheckResult::framework("Middleware", true, "Middleware is configured");
        }
        CheckResult::framework(
            "Middleware",
            false,
            "Security middleware is recommended for production",
        )
    }

    fn check_error_handlers(&self) -> CheckResult {
        if self.source_contains(&["@app.exception_handler"]) {
            return CheckResult::framework(
                "Error handlers",
                true,
                "Exception handlers are configured",
            );
        }
        CheckResult::framework(
            "Error handlers",
            false,
            "Exception handlers are recommended for production",
        )
    }

    fn check_database_config(&self) -> CheckResult {
        if self.source_contains(&["SQLAlchemy", "MongoDB", "database", "db"]) {
            return CheckResult::framework(
                "Database configuration",
                true,
                "Database appears to be configured",
            );
        }
        CheckResult::framework(
            "Database configuration",
            false,
            "Database configuration not found (may be optional)",
        )
    }
}

impl Checker for FastApiChecker {
    fn check_all(&self) -> (bool, Vec<CheckResult>) {
        tracing::info!("Checking FastAPI application readiness...");
        let results = vec![
            super::check_requirements_file(&self.project_root),
            self.check_app(),
            self.check_asgi_server(),
            super::check_environment_config(&self.project_root),
            self.check_cors(),
            self.check_middleware(),
            self.check_error_handlers(),
            self.check_database_config(),
        ];
        let all_passed = results.iter().all(|r| r.passed);
        (all_passed, results)
    }
}
