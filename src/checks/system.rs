// ABOUTME: Platform-agnostic readiness gate run before any framework logic.
// ABOUTME: Covers runtime pins, dependency pinning, config, secrets, and git.

use std::path::PathBuf;
use std::process::Command;

use super::{CheckResult, Checker, Severity};

/// Placeholder tokens that disqualify a secret value in `.env`.
const ENV_PLACEHOLDER_TOKENS: &[&str] = &[
    "changeme",
    "replace_me",
    "your-secret",
    "default",
    "todo",
    "placeholder",
];

/// Version constraint operators that count as a pinned dependency.
const PIN_OPERATORS: &[&str] = &["==", ">=", "<=", "~=", "==="];

/// Minimum pinned/total ratio for the dependency-pinning check to pass.
const PIN_RATIO_THRESHOLD: f64 = 0.6;

/// Deployment config files any of which satisfies the config-present check.
const CONFIG_CANDIDATES: &[&str] = &[
    "deployment.yaml",
    "deployment.yml",
    "deployment.json",
    "render.yaml",
    "railway.json",
    "vercel.json",
];

/// Mandatory sanity checks that apply to every project. This gate is cheap
/// and security-relevant, so deploy re-runs it even when a readiness
/// inspection already did.
pub struct SystemChecker {
    project_root: PathBuf,
}

impl SystemChecker {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Ensure the project declares its runtime somewhere. Missing pins are a
    /// pass at low severity: the deployment environment then decides.
    fn check_runtime_manifest(&self) -> CheckResult {
        let root = &self.project_root;

        if let Some(content) = super::read_if_present(&root.join("runtime.txt")) {
            let content = content.trim();
            return CheckResult::system(
                "Python runtime",
                !content.is_empty(),
                format!(
                    "runtime.txt -> {}",
                    if content.is_empty() { "empty" } else { content }
                ),
                Severity::High,
            );
        }

        if let Some(version) = super::read_if_present(&root.join(".python-version")) {
            let version = version.trim().to_string();
            if !version.is_empty() {
                return CheckResult::system(
                    "Python runtime",
                    true,
                    format!(".python-version -> {version}"),
                    Severity::High,
                );
            }
        }

        if let Some(content) = super::read_if_present(&root.join("pyproject.toml"))
            && (content.contains("requires-python")
                || content.contains("python =")
                || content.contains("python="))
        {
            return CheckResult::system(
                "Python runtime",
                true,
                "pyproject.toml declares Python requirements",
                Severity::High,
            );
        }

        if let Some(content) = super::read_if_present(&root.join("Pipfile"))
            && content.contains("python_version")
        {
            return CheckResult::system(
                "Python runtime",
                true,
                "Pipfile pins python_version",
                Severity::High,
            );
        }

        CheckResult::system(
            "Python runtime",
            true,
            "No explicit runtime pin detected; interpreter version will come from \
             your deployment environment",
            Severity::Low,
        )
    }

    /// Verify most dependencies in requirements.txt carry a version
    /// constraint (pinned/total >= 0.6).
    fn check_dependency_pinning(&self) -> CheckResult {
        let Some(content) = super::read_if_present(&self.project_root.join("requirements.txt"))
        else {
            return CheckResult::system(
                "Dependency pinning",
                false,
                "requirements.txt is missing",
                Severity::High,
            );
        };

        let mut pinned = 0usize;
        let mut total = 0usize;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            total += 1;
            if PIN_OPERATORS.iter().any(|op| line.contains(op)) {
                pinned += 1;
            }
        }

        if total == 0 {
            return CheckResult::system(
                "Dependency pinning",
                false,
                "requirements.txt is empty",
                Severity::Medium,
            );
        }

        let passed = pinned as f64 / total as f64 >= PIN_RATIO_THRESHOLD;
        CheckResult::system(
            "Dependency pinning",
            passed,
            if passed {
                format!("{pinned}/{total} dependencies pinned")
            } else {
                format!("Only {pinned}/{total} dependencies pinned")
            },
            Severity::Medium,
        )
    }

    fn check_deployment_config_present(&self) -> CheckResult {
        if let Some(found) = super::first_existing(&self.project_root, CONFIG_CANDIDATES) {
            return CheckResult::system(
                "Deployment config",
                true,
                format!("Found {found}"),
                Severity::High,
            );
        }
        CheckResult::system(
            "Deployment config",
            false,
            "No deployment config (deployment.* / render.yaml / railway.json / vercel.json)",
            Severity::High,
        )
    }

    /// Validate .env handling and ensure secrets are not placeholders.
    fn check_env_secret_hardening(&self) -> CheckResult {
        let env_file = self.project_root.join(".env");
        let example_file = self.project_root.join(".env.example");

        if !env_file.is_file() && !example_file.is_file() {
            return CheckResult::system(
                "Environment variables",
                false,
                "Provide .env or .env.example with production secrets",
                Severity::High,
            );
        }

        let Some(content) = super::read_if_present(&env_file) else {
            return CheckResult::system(
                "Environment variables",
                true,
                "Only template .env.example present - remember to supply real secrets",
                Severity::Medium,
            );
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((_, value)) = line.split_once('=') else {
                continue;
            };
            let lowered = value.trim().trim_matches(['"', '\'']).to_lowercase();
            if ENV_PLACEHOLDER_TOKENS
                .iter()
                .any(|token| lowered.contains(token))
            {
                return CheckResult::system(
                    "Environment variables",
                    false,
                    format!("Placeholder secret detected ({line})"),
                    Severity::High,
                );
            }
        }

        CheckResult::system(
            "Environment variables",
            true,
            ".env present with non-placeholder values",
            Severity::High,
        )
    }

    /// Fail on uncommitted changes. A missing git CLI or a non-repository
    /// root both pass; the check only bites inside a dirty work tree.
    fn check_git_status_clean(&self) -> CheckResult {
        let repo_check = Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(&self.project_root)
            .output();

        let repo_check = match repo_check {
            Ok(output) => output,
            Err(_) => {
                return CheckResult::system(
                    "Git workspace",
                    true,
                    "Git CLI not installed; skipping cleanliness check",
                    Severity::Low,
                );
            }
        };

        if !repo_check.status.success() {
            return CheckResult::system(
                "Git workspace",
                true,
                "Not a git repository",
                Severity::Low,
            );
        }

        let status = Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(&self.project_root)
            .output();

        match status {
            Ok(output) if output.status.success() => {
                let clean = output.stdout.iter().all(u8::is_ascii_whitespace);
                CheckResult::system(
                    "Git workspace",
                    clean,
                    if clean {
                        "Working tree clean"
                    } else {
                        "Uncommitted changes detected"
                    },
                    Severity::Medium,
                )
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                CheckResult::system(
                    "Git workspace",
                    false,
                    if stderr.is_empty() {
                        "Unable to inspect git status".to_string()
                    } else {
                        stderr
                    },
                    Severity::Medium,
                )
            }
            Err(e) => CheckResult::system(
                "Git workspace",
                false,
                format!("Unable to inspect git status: {e}"),
                Severity::Medium,
            ),
        }
    }
}

impl Checker for SystemChecker {
    fn check_all(&self) -> (bool, Vec<CheckResult>) {
        let results = vec![
            self.check_runtime_manifest(),
            self.check_dependency_pinning(),
            self.check_deployment_config_present(),
            self.check_env_secret_hardening(),
            self.check_git_status_clean(),
        ];
        let all_passed = results.iter().all(|r| r.passed);
        (all_passed, results)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn checker_in(dir: &Path) -> SystemChecker {
        SystemChecker::new(dir.to_path_buf())
    }

    #[test]
    fn pinning_passes_at_two_thirds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("requirements.txt"),
            "Flask==2.3.2\ngunicorn>=20\nrequests\n",
        )
        .unwrap();

        let result = checker_in(dir.path()).check_dependency_pinning();
        assert!(result.passed, "{}", result.message);
        assert_eq!(result.message, "2/3 dependencies pinned");
    }

    #[test]
    fn pinning_fails_below_threshold() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("requirements.txt"),
            "flask\nrequests\ngunicorn==20.1\n",
        )
        .unwrap();

        let result = checker_in(dir.path()).check_dependency_pinning();
        assert!(!result.passed);
        assert_eq!(result.message, "Only 1/3 dependencies pinned");
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("requirements.txt"),
            "# pinned deps\n\nFlask==2.3.2\n",
        )
        .unwrap();

        let result = checker_in(dir.path()).check_dependency_pinning();
        assert!(result.passed);
        assert_eq!(result.message, "1/1 dependencies pinned");
    }

    #[test]
    fn empty_requirements_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "# nothing\n").unwrap();

        let result = checker_in(dir.path()).check_dependency_pinning();
        assert!(!result.passed);
        assert_eq!(result.message, "requirements.txt is empty");
    }

    #[test]
    fn placeholder_secret_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "SECRET_KEY=changeme\n").unwrap();

        let result = checker_in(dir.path()).check_env_secret_hardening();
        assert!(!result.passed);
        assert!(result.message.contains("Placeholder secret detected"));
    }

    #[test]
    fn example_only_env_passes_with_reminder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env.example"), "SECRET_KEY=\n").unwrap();

        let result = checker_in(dir.path()).check_env_secret_hardening();
        assert!(result.passed);
        assert!(result.message.contains("template"));
    }

    #[test]
    fn runtime_txt_pin_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("runtime.txt"), "python-3.11.4\n").unwrap();

        let result = checker_in(dir.path()).check_runtime_manifest();
        assert!(result.passed);
        assert_eq!(result.message, "runtime.txt -> python-3.11.4");
    }

    #[test]
    fn missing_runtime_pin_still_passes() {
        let dir = tempfile::tempdir().unwrap();
        let result = checker_in(dir.path()).check_runtime_manifest();
        assert!(result.passed);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn deployment_config_candidates_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("render.yaml"), "services: []\n").unwrap();

        let result = checker_in(dir.path()).check_deployment_config_present();
        assert!(result.passed);
        assert_eq!(result.message, "Found render.yaml");
    }
}
