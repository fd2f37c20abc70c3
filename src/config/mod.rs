// ABOUTME: Deployment configuration discovery, parsing, and the env loader.
// ABOUTME: Accepts deployment.{yaml,yml,json} and the dotted hidden variants.

mod validator;

pub use validator::{validate, validate_env_vars, VALID_PLATFORMS};

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Config files probed in order when no explicit file is given.
const DEFAULT_CONFIG_FILES: &[&str] = &[
    "deployment.yaml",
    "deployment.yml",
    "deployment.json",
    ".deployment.yaml",
    ".deployment.yml",
    ".deployment.json",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("config file not found: {0}")]
    NotFound(String),
}

/// A `platform` key may name one target or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformSpec {
    One(String),
    Many(Vec<String>),
}

impl PlatformSpec {
    pub fn names(&self) -> Vec<&str> {
        match self {
            PlatformSpec::One(name) => vec![name.as_str()],
            PlatformSpec::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for PlatformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Parsed deployment configuration. Unknown keys are preserved in `extra` so
/// platform deployers can consult them (start_command, env_vars, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeployConfig {
    /// Load configuration by probing the default candidate files. A missing
    /// config is not an error here; the validator reports it later.
    pub fn discover(project_root: &Path) -> Result<Self, ConfigError> {
        for candidate in DEFAULT_CONFIG_FILES {
            if project_root.join(candidate).is_file() {
                tracing::info!("Configuration loaded from {candidate}");
                return Self::from_file(project_root, candidate);
            }
        }
        tracing::warn!("No configuration file found");
        Ok(Self::default())
    }

    /// Load a specific config file relative to the project root.
    pub fn from_file(project_root: &Path, config_file: &str) -> Result<Self, ConfigError> {
        let path = project_root.join(config_file);
        if !path.is_file() {
            return Err(ConfigError::NotFound(config_file.to_string()));
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: config_file.to_string(),
            source,
        })?;

        if config_file.ends_with(".yaml") || config_file.ends_with(".yml") {
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: config_file.to_string(),
                message: e.to_string(),
            })
        } else if config_file.ends_with(".json") {
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: config_file.to_string(),
                message: e.to_string(),
            })
        } else {
            Err(ConfigError::UnsupportedFormat(config_file.to_string()))
        }
    }

    /// Serialize back to a JSON value, used when recording config snapshots
    /// alongside deployment checkpoints.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Parse a dotenv-style file into key/value pairs. Comments and blank lines
/// are skipped; values keep everything after the first `=`.
pub fn load_env_file(project_root: &Path, env_file: &str) -> BTreeMap<String, String> {
    let path = project_root.join(env_file);
    let Ok(raw) = std::fs::read_to_string(&path) else {
        tracing::warn!("Environment file not found: {env_file}");
        return BTreeMap::new();
    };

    let mut vars = BTreeMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    tracing::info!("Loaded {} environment variables", vars.len());
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn yaml_config_with_single_platform() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(
                dir.path().join("deployment.yaml"),
                "platform: render\napp_name: demo\nstart_command: python app.py\n",
            )
            .unwrap();

            let config = DeployConfig::discover(dir.path()).unwrap();
            assert_eq!(config.platform, Some(PlatformSpec::One("render".into())));
            assert_eq!(config.app_name.as_deref(), Some("demo"));
            assert_eq!(config.extra["start_command"], "python app.py");
        }

        #[test]
        fn json_config_with_platform_list() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(
                dir.path().join("deployment.json"),
                r#"{"platform": ["render", "heroku"], "app_name": "demo"}"#,
            )
            .unwrap();

            let config = DeployConfig::discover(dir.path()).unwrap();
            let spec = config.platform.unwrap();
            assert_eq!(spec.names(), vec!["render", "heroku"]);
        }

        #[test]
        fn yaml_takes_precedence_over_json() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("deployment.yaml"), "app_name: yaml\n").unwrap();
            std::fs::write(dir.path().join("deployment.json"), r#"{"app_name": "json"}"#)
                .unwrap();

            let config = DeployConfig::discover(dir.path()).unwrap();
            assert_eq!(config.app_name.as_deref(), Some("yaml"));
        }

        #[test]
        fn missing_config_is_empty_not_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let config = DeployConfig::discover(dir.path()).unwrap();
            assert!(config.platform.is_none());
            assert!(config.app_name.is_none());
        }

        #[test]
        fn malformed_yaml_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("deployment.yaml"), "platform: [unclosed\n").unwrap();

            let err = DeployConfig::discover(dir.path()).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }));
        }

        #[test]
        fn unsupported_extension_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("deployment.toml"), "platform = 'render'\n").unwrap();

            let err = DeployConfig::from_file(dir.path(), "deployment.toml").unwrap_err();
            assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
        }
    }

    mod env {
        use super::*;

        #[test]
        fn env_file_parses_pairs_and_skips_comments() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(
                dir.path().join(".env"),
                "# secrets\nSECRET_KEY=abc=def\n\nDATABASE_URL = postgres://x\n",
            )
            .unwrap();

            let vars = load_env_file(dir.path(), ".env");
            assert_eq!(vars.len(), 2);
            assert_eq!(vars["SECRET_KEY"], "abc=def");
            assert_eq!(vars["DATABASE_URL"], "postgres://x");
        }

        #[test]
        fn missing_env_file_yields_empty_map() {
            let dir = tempfile::tempdir().unwrap();
            assert!(load_env_file(dir.path(), ".env").is_empty());
        }
    }
}
