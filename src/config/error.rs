//! Errors raised while building the tool's [`Config`](super::Config).

use std::path::PathBuf;
use thiserror::Error;

/// Why `elm327.toml` or an `ELM327_*` override could not be turned into a
/// usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// The config file exists but could not be read.
    #[error("Failed to read configuration file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the `[serial]`,
    /// `[driver]` and `[logging]` sections.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value the driver cannot work with, such as a zero timeout or a
    /// `target_baud` outside the `AT BRD` table.
    #[error("Invalid configuration value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    /// An `ELM327_<SECTION>_<KEY>` variable holds an unparsable value.
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },
}

impl ConfigError {
    /// Invalid value for the dotted config `key` (e.g. `serial.timeout_ms`).
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Unparsable override in environment variable `var`.
    pub fn env_parse(var: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_names_key() {
        let err = ConfigError::validation("driver.target_baud", "not in the AT BRD table");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'driver.target_baud': not in the AT BRD table"
        );
    }

    #[test]
    fn test_parse_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("[serial").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
