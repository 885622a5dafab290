//! Transport-level error types.
//!
//! Kept separate from the protocol errors in [`crate::error`] so that a
//! transport failure (device unplugged, read timeout) is never confused with a
//! reply the chip actually sent.

use thiserror::Error;

/// Errors that can occur while moving bytes over a transport.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// No adapter with the requested USB identifiers is connected.
    #[error("No adapter found with VID 0x{vid:04X} / PID 0x{pid:04X}")]
    AdapterNotFound { vid: u16, pid: u16 },

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A blocking read did not complete within the transport timeout.
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The transport reached end of stream before the expected bytes arrived.
    #[error("End of stream after {received} byte(s)")]
    Eof { received: usize },

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Timeout error from a duration.
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout(duration)
    }
}
