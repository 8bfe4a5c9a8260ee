//! Sync configuration
//!
//! Loaded from a JSON file; every field has a default so a partial (or
//! empty) file is valid.

use std::path::Path;

use rolling_logger::{LoggerConfig, LoggerError, RollingLogger};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::DEFAULT_PAGE_LIMIT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("owner_only is set but no signed-in identity was provided")]
    MissingIdentity,
    #[error(transparent)]
    Logger(#[from] LoggerError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Page size requested by `load_initial`
    pub page_limit: u32,
    /// Only fetch and subscribe to the signed-in user's todos
    pub owner_only: bool,
    pub logging: LoggerConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            owner_only: false,
            logging: LoggerConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Install the global logger described by `logging`
    pub fn init_logging(&self) -> Result<RollingLogger, ConfigError> {
        Ok(RollingLogger::init(&self.logging)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = SyncConfig::from_json("{}").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.page_limit, DEFAULT_PAGE_LIMIT);
        assert!(!config.owner_only);
    }

    #[test]
    fn test_partial_config() {
        let config = SyncConfig::from_json(
            r#"{ "page_limit": 25, "owner_only": true, "logging": { "level": "debug" } }"#,
        )
        .unwrap();
        assert_eq!(config.page_limit, 25);
        assert!(config.owner_only);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.buffer_lines, LoggerConfig::default().buffer_lines);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SyncConfig::from_json("{ page_limit: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");
        let config = SyncConfig {
            page_limit: 7,
            ..SyncConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(SyncConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyncConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
