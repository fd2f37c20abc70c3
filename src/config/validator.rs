// ABOUTME: Structural validation of deployment configs before any deploy.
// ABOUTME: Collects every error instead of stopping at the first.

use super::{DeployConfig, PlatformSpec};

/// Platform names accepted by the validator. Wider than the deployer
/// registry: "aws" passes validation but has no registered deployer yet.
pub const VALID_PLATFORMS: &[&str] = &["render", "railway", "vercel", "heroku", "aws"];

/// Check required keys and value shapes. Returns all errors found.
pub fn validate(config: &DeployConfig) -> (bool, Vec<String>) {
    let mut errors = Vec::new();

    match &config.platform {
        None => errors.push("Missing required configuration key: platform".to_string()),
        Some(PlatformSpec::One(name)) => {
            if !VALID_PLATFORMS.contains(&name.to_lowercase().as_str()) {
                errors.push(format!(
                    "Invalid platform: {name}. Valid platforms: {VALID_PLATFORMS:?}"
                ));
            }
        }
        Some(PlatformSpec::Many(names)) => {
            for name in names {
                if !VALID_PLATFORMS.contains(&name.to_lowercase().as_str()) {
                    errors.push(format!("Invalid platform in list: {name}"));
                }
            }
        }
    }

    match &config.app_name {
        None => errors.push("Missing required configuration key: app_name".to_string()),
        Some(name) if name.trim().is_empty() => {
            errors.push("app_name cannot be empty".to_string());
        }
        Some(_) => {}
    }

    let is_valid = errors.is_empty();
    if is_valid {
        tracing::info!("Configuration validation passed");
    } else {
        tracing::error!("Configuration validation failed: {errors:?}");
    }
    (is_valid, errors)
}

/// Check that every name in `required_env_vars` appears under `env_vars`.
pub fn validate_env_vars(config: &DeployConfig) -> (bool, Vec<String>) {
    let mut errors = Vec::new();

    let env_vars = match config.extra.get("env_vars") {
        Some(serde_json::Value::Object(map)) => Some(map),
        Some(_) => {
            errors.push("env_vars must be a mapping".to_string());
            return (false, errors);
        }
        None => None,
    };

    if let Some(serde_json::Value::Array(required)) = config.extra.get("required_env_vars") {
        for var in required {
            if let serde_json::Value::String(name) = var
                && !env_vars.is_some_and(|map| map.contains_key(name))
            {
                errors.push(format!("Missing required environment variable: {name}"));
            }
        }
    }

    (errors.is_empty(), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(platform: Option<PlatformSpec>, app_name: Option<&str>) -> DeployConfig {
        DeployConfig {
            platform,
            app_name: app_name.map(str::to_string),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn valid_single_platform_config_passes() {
        let cfg = config(Some(PlatformSpec::One("render".into())), Some("demo"));
        let (ok, errors) = validate(&cfg);
        assert!(ok, "{errors:?}");
    }

    #[test]
    fn missing_keys_are_both_reported() {
        let (ok, errors) = validate(&config(None, None));
        assert!(!ok);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn aws_is_accepted_by_the_validator() {
        let cfg = config(Some(PlatformSpec::One("aws".into())), Some("demo"));
        assert!(validate(&cfg).0);
    }

    #[test]
    fn unknown_platform_in_list_is_flagged() {
        let cfg = config(
            Some(PlatformSpec::Many(vec!["render".into(), "fly".into()])),
            Some("demo"),
        );
        let (ok, errors) = validate(&cfg);
        assert!(!ok);
        assert!(errors[0].contains("Invalid platform in list: fly"));
    }

    #[test]
    fn blank_app_name_is_rejected() {
        let cfg = config(Some(PlatformSpec::One("render".into())), Some("   "));
        let (ok, errors) = validate(&cfg);
        assert!(!ok);
        assert!(errors[0].contains("app_name cannot be empty"));
    }

    #[test]
    fn required_env_vars_must_be_present() {
        let mut cfg = config(Some(PlatformSpec::One("render".into())), Some("demo"));
        cfg.extra.insert(
            "required_env_vars".into(),
            serde_json::json!(["SECRET_KEY", "DATABASE_URL"]),
        );
        cfg.extra.insert(
            "env_vars".into(),
            serde_json::json!({"SECRET_KEY": "abc"}),
        );

        let (ok, errors) = validate_env_vars(&cfg);
        assert!(!ok);
        assert_eq!(
            errors,
            vec!["Missing required environment variable: DATABASE_URL"]
        );
    }
}
