//! Configuration for the `elm327` tool.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! 1. `ELM327_CONFIG` environment variable (explicit path)
//! 2. `./elm327.toml` (current directory)
//! 3. `~/.config/elm327/elm327.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\elm327\elm327.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `ELM327_<SECTION>_<KEY>`:
//! - `ELM327_SERIAL_PORT=/dev/ttyUSB0`
//! - `ELM327_SERIAL_BAUD_RATE=38400`
//! - `ELM327_DRIVER_TARGET_BAUD=115200`
//! - `ELM327_LOGGING_FORMAT=json`
//!
//! # Example
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! timeout_ms = 2000
//!
//! [driver]
//! target_baud = 115200
//!
//! [logging]
//! level = "debug"
//! format = "compact"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{Config, DriverConfig, LogFormat, LoggingConfig, SerialConfig};
