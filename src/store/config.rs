//! Store configuration parsing.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Row store configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Store settings.
    #[serde(default)]
    pub store: StoreSettings,
}

/// Location and durability of the fjall store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the store directory.
    pub path: PathBuf,
    /// Flush to disk after every write.
    pub sync_on_write: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".typed-props"),
            sync_on_write: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Configuration pointing at `path`, other settings defaulted.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreSettings {
                path: path.into(),
                ..StoreSettings::default()
            },
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),
    /// TOML parse error.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
path = "/var/lib/typed-props"
sync_on_write = false
"#;
        let config = StoreConfig::from_str(toml).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/typed-props"));
        assert!(!config.store.sync_on_write);
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.store.path, PathBuf::from(".typed-props"));
        assert!(config.store.sync_on_write);

        let partial = StoreConfig::from_str("[store]\npath = \"props\"\n").unwrap();
        assert!(partial.store.sync_on_write);
        assert_eq!(partial, StoreConfig::at("props"));
    }

    #[test]
    fn test_parse_error() {
        let err = StoreConfig::from_str("[store]\nsync_on_write = \"often\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = StoreConfig::from_file("/nonexistent/typed-props.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/typed-props.toml"));
    }
}
