//! Top-level configuration file handling

use crate::logger::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable that overrides `logger.log_dir`
pub const LOG_DIR_ENV: &str = "CMDLOG_DIR";

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading or writing the config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value is out of range or inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete cmdlog configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmdlogConfig {
    /// Keystroke logger settings
    pub logger: LoggerConfig,
}

impl CmdlogConfig {
    /// Default config file location (`~/.config/cmdlog/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cmdlog").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Load from `path`, or from the default location when `path` is None
    ///
    /// A missing file yields the default configuration. An explicitly given
    /// path that does not exist is still treated as missing, matching the
    /// behaviour of a fresh install.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        debug!("Loading config from {}", path.display());
        Self::load(&path)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides using a custom variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(LOG_DIR_ENV) {
            debug!("{} overrides log_dir: {}", LOG_DIR_ENV, dir);
            self.logger.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// Check value ranges and special key uniqueness
    pub fn validate(&self) -> ConfigResult<()> {
        let logger = &self.logger;

        if logger.max_run_len == 0 {
            return Err(ConfigError::Invalid(
                "logger.max_run_len must be greater than zero".to_string(),
            ));
        }

        let mut codes = HashSet::new();
        let mut labels = HashSet::new();
        for key in &logger.special_keys {
            if key.label.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "special key 0x{:X} has an empty label",
                    key.code
                )));
            }
            if key.label.contains(['<', '>', ' ']) {
                return Err(ConfigError::Invalid(format!(
                    "special key label '{}' may not contain '<', '>' or spaces",
                    key.label
                )));
            }
            if !codes.insert(key.code) {
                return Err(ConfigError::Invalid(format!(
                    "special key code 0x{:X} is listed twice",
                    key.code
                )));
            }
            if !labels.insert(key.label.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "special key label '{}' is listed twice",
                    key.label
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::SpecialKey;
    use tempfile::TempDir;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CmdlogConfig::from_toml("").unwrap();
        assert_eq!(config, CmdlogConfig::default());
    }

    #[test]
    fn partial_logger_section() {
        let config = CmdlogConfig::from_toml(
            r#"
            [logger]
            log_dir = "/tmp/cmdlog"
            log_insert_text = true
            "#,
        )
        .unwrap();

        assert_eq!(config.logger.log_dir, Some(PathBuf::from("/tmp/cmdlog")));
        assert!(config.logger.log_insert_text);
        assert_eq!(config.logger.max_run_len, 511);
        assert_eq!(config.logger.special_keys.len(), 2);
    }

    #[test]
    fn special_keys_accept_hex_literals() {
        let config = CmdlogConfig::from_toml(
            r#"
            [[logger.special_keys]]
            code = 0xFFFF9D95
            label = "BS"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.logger.special_keys,
            vec![SpecialKey::new(0xFFFF9D95, "BS")]
        );
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = CmdlogConfig::from_toml("[logger\nlog_dir = 3").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.toml");
        let config = CmdlogConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config, CmdlogConfig::default());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = CmdlogConfig::default();
        config.logger.log_dir = Some(tmp.path().join("logs"));
        config.logger.max_run_len = 64;
        config.save(&path).unwrap();

        let loaded = CmdlogConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn env_override_sets_log_dir() {
        let mut config = CmdlogConfig::default();
        config.apply_overrides_from(|name| {
            (name == LOG_DIR_ENV).then(|| "/var/log/keys".to_string())
        });
        assert_eq!(config.logger.log_dir, Some(PathBuf::from("/var/log/keys")));
    }

    #[test]
    fn env_override_absent_keeps_value() {
        let mut config = CmdlogConfig::default();
        config.logger.log_dir = Some(PathBuf::from("/a"));
        config.apply_overrides_from(|_| None);
        assert_eq!(config.logger.log_dir, Some(PathBuf::from("/a")));
    }

    #[test]
    fn validate_rejects_zero_run_len() {
        let mut config = CmdlogConfig::default();
        config.logger.max_run_len = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_duplicate_codes() {
        let mut config = CmdlogConfig::default();
        config
            .logger
            .special_keys
            .push(SpecialKey::new(crate::BACKSPACE_CODE, "BKSP"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bracketed_label() {
        let mut config = CmdlogConfig::default();
        config.logger.special_keys = vec![SpecialKey::new(0x1234, "<F1>")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        CmdlogConfig::default().validate().unwrap();
    }
}
