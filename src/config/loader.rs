//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ConsoleConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ConsoleConfig, ConfigError> {
    let config: ConsoleConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), base_url = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut ConsoleConfig) {
        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }
        if let Some(token) = self.token {
            config.api.token = Some(token);
        }
    }
}

/// Build the effective configuration: file (or defaults), then overrides,
/// then validation of the result.
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<ConsoleConfig, ConfigError> {
    let mut config: ConsoleConfig = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ConsoleConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    tracing::debug!(base_url = %config.api.base_url, "Configuration resolved");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let config = parse_config(
            r#"
            [api]
            base_url = "https://pricing.example.com/api"
            token_env = "ADMIN_TOKEN"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.token_env, "ADMIN_TOKEN");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = parse_config("[timeouts]\nconnect_secs = 0\nrequest_secs = 0\n").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("timeouts.connect_secs"));
        assert!(message.contains("timeouts.request_secs"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("pricing-console-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[retries]\nenabled = false\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.retries.enabled);

        fs::remove_file(&path).unwrap_or_default();
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_resolve_defaults_are_valid() {
        let config = resolve_config(None, Overrides::default()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_resolve_validates_url_override() {
        let overrides = Overrides {
            base_url: Some("not a url".into()),
            ..Default::default()
        };
        match resolve_config(None, overrides) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "api.base_url"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_override_repairs_file_value() {
        let path = std::env::temp_dir().join(format!("pricing-console-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[api]\nbase_url = \"ftp://pricing.example.com\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));

        let overrides = Overrides {
            base_url: Some("https://pricing.example.com/api".into()),
            token: Some("cli-token".into()),
        };
        let config = resolve_config(Some(&path), overrides).unwrap();
        assert_eq!(config.api.base_url, "https://pricing.example.com/api");
        assert_eq!(config.api.token.as_deref(), Some("cli-token"));

        fs::remove_file(&path).unwrap_or_default();
    }
}
