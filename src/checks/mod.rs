// ABOUTME: Readiness check results and the Checker capability trait.
// ABOUTME: Shared helper checks used by the per-framework checkers.

mod django;
mod fastapi;
mod flask;
mod system;

pub use django::DjangoChecker;
pub use fastapi::FastApiChecker;
pub use flask::FlaskChecker;
pub use system::SystemChecker;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

/// Supported web frameworks with readiness checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Framework {
    Flask,
    Django,
    FastApi,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::Flask, Framework::Django, Framework::FastApi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Flask => "flask",
            Framework::Django => "django",
            Framework::FastApi => "fastapi",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "flask" => Ok(Framework::Flask),
            "django" => Ok(Framework::Django),
            "fastapi" => Ok(Framework::FastApi),
            other => Err(format!("unknown framework: {other}")),
        }
    }
}

/// Where a check comes from. Reporting context only: control flow must key
/// off `passed`, never off the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    System,
    Framework,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::System => f.write_str("system"),
            Category::Framework => f.write_str("framework"),
        }
    }
}

/// How urgent a failed check is. Reporting context only, like [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Low => f.write_str("low"),
            Severity::Medium => f.write_str("medium"),
            Severity::High => f.write_str("high"),
        }
    }
}

/// Result of one deployment readiness check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub category: Category,
    pub severity: Severity,
}

impl CheckResult {
    /// Framework-category result with info severity, the common case.
    pub fn framework(name: &str, passed: bool, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            message: message.into(),
            category: Category::Framework,
            severity: Severity::Info,
        }
    }

    pub fn system(
        name: &str,
        passed: bool,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name: name.to_string(),
            passed,
            message: message.into(),
            category: Category::System,
            severity,
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "✓" } else { "✗" }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.icon(), self.category, self.name)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// A readiness gate. Both the system-wide checker and the per-framework
/// checkers expose this one shape.
pub trait Checker {
    /// Run every check and return (all_passed, results).
    fn check_all(&self) -> (bool, Vec<CheckResult>);
}

/// Build the fixed framework-checker registration table. The framework set
/// is closed and small; no dynamic registration.
pub fn default_checkers(
    project_root: &Path,
) -> std::collections::BTreeMap<Framework, Box<dyn Checker>> {
    let mut table: std::collections::BTreeMap<Framework, Box<dyn Checker>> =
        std::collections::BTreeMap::new();
    table.insert(
        Framework::Flask,
        Box::new(FlaskChecker::new(project_root.to_path_buf())),
    );
    table.insert(
        Framework::Django,
        Box::new(DjangoChecker::new(project_root.to_path_buf())),
    );
    table.insert(
        Framework::FastApi,
        Box::new(FastApiChecker::new(project_root.to_path_buf())),
    );
    table
}

// Shared helper checks. These are composed by the concrete checkers instead
// of living on a base type.

/// Read a file, logging (not propagating) any error.
pub(crate) fn read_if_present(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!("Error reading {}: {e}", path.display());
            None
        }
    }
}

/// First of `names` that exists as a file under `root`.
pub(crate) fn first_existing<'a>(root: &Path, names: &[&'a str]) -> Option<&'a str> {
    names.iter().copied().find(|name| root.join(name).is_file())
}

/// requirements.txt presence, shared by every framework checker.
pub(crate) fn check_requirements_file(root: &Path) -> CheckResult {
    let found = root.join("requirements.txt").is_file();
    CheckResult::framework(
        "Requirements file",
        found,
        if found {
            "requirements.txt found"
        } else {
            "requirements.txt not found"
        },
    )
}

/// .env / .env.example presence, shared by every framework checker.
pub(crate) fn check_environment_config(root: &Path) -> CheckResult {
    let found = root.join(".env").is_file() || root.join(".env.example").is_file();
    CheckResult::framework(
        "Environment configuration",
        found,
        if found {
            ".env or .env.example found"
        } else {
            ".env or .env.example not found"
        },
    )
}
