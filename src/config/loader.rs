//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{Config, LogFormat};
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "ELM327";

/// Config file name
const CONFIG_FILE_NAME: &str = "elm327.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "ELM327_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `ELM327_CONFIG` environment variable (explicit path)
    /// 2. `./elm327.toml` (current directory)
    /// 3. `~/.config/elm327/elm327.toml` (XDG on Linux/macOS)
    /// 4. `%APPDATA%\elm327\elm327.toml` (Windows)
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut config = Config::default();
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: None,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.exists())
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Get the default config file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("elm327").join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn env_var(key: &str) -> Option<(String, String)> {
    let name = format!("{ENV_PREFIX}_{key}");
    std::env::var(&name).ok().map(|value| (name, value))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str, what: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse(name, format!("Invalid {what}: {value:?}")))
}

/// Parse a USB id given as hex (`0x0403` or `0403`).
fn parse_usb_id(name: &str, value: &str) -> ConfigResult<u16> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u16::from_str_radix(digits, 16)
        .map_err(|_| ConfigError::env_parse(name, format!("Invalid USB id: {value:?}")))
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `ELM327_<SECTION>_<KEY>`, e.g.
/// `ELM327_SERIAL_PORT=/dev/ttyUSB0` or `ELM327_DRIVER_TARGET_BAUD=115200`.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let Some((_, value)) = env_var("SERIAL_PORT") {
        config.serial.port = Some(value);
    }
    if let Some((name, value)) = env_var("SERIAL_BAUD_RATE") {
        config.serial.baud_rate = parse_env(&name, &value, "baud rate")?;
    }
    if let Some((name, value)) = env_var("SERIAL_TIMEOUT_MS") {
        config.serial.timeout_ms = parse_env(&name, &value, "timeout")?;
    }
    if let Some((name, value)) = env_var("SERIAL_VID") {
        config.serial.vid = parse_usb_id(&name, &value)?;
    }
    if let Some((name, value)) = env_var("SERIAL_PID") {
        config.serial.pid = parse_usb_id(&name, &value)?;
    }

    if let Some((name, value)) = env_var("DRIVER_TARGET_BAUD") {
        config.driver.target_baud = Some(parse_env(&name, &value, "baud rate")?);
    }

    if let Some((_, value)) = env_var("LOGGING_LEVEL") {
        config.logging.level = value;
    }
    if let Some((name, value)) = env_var("LOGGING_FORMAT") {
        config.logging.format = match value.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => {
                return Err(ConfigError::env_parse(
                    name,
                    "expected one of json, pretty, compact",
                ))
            }
        };
    }
    if let Some((_, value)) = env_var("LOGGING_FILE") {
        config.logging.file = Some(PathBuf::from(value));
    }

    Ok(())
}
