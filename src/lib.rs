//! ELM327 Adapter Library
//!
//! Drives an ELM327 OBD-to-serial interpreter chip through its AT command
//! shell: software reset and firmware identification, arbitrary AT commands,
//! and the temporary baud-rate switch.
//!
//! # Modules
//!
//! - `port`: Transport abstraction with a hardware serial port and a mock
//! - `elm327`: Reply framing, command normalization and the protocol driver
//! - `config`: Configuration management with TOML support
//! - `error`: Driver error taxonomy

pub mod config;
pub mod elm327;
pub mod error;
pub mod port;

// Re-export commonly used types for convenience
pub use elm327::{BaudCandidate, Command, Elm327, FirmwareVersion, Session, Terminator};
pub use error::{Elm327Error, Elm327Result};
pub use port::{
    LinkSpeed, MockSerialPort, PortConfiguration, PortError, SyncSerialPort, Transport,
};

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
