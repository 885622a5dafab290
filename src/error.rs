//! Driver error types.
//!
//! Each variant names the phase that failed so the caller can decide between
//! resetting, reconnecting, or giving up. Nothing is retried internally.

use crate::port::PortError;
use thiserror::Error;

/// A specialized `Result` type for driver operations.
pub type Elm327Result<T> = Result<T, Elm327Error>;

/// Errors surfaced by the ELM327 driver.
#[derive(Debug, Error)]
pub enum Elm327Error {
    /// The reply framing was not recognized, or a frame did not end with the
    /// established terminator. The session is desynchronized.
    #[error("Framing error: {0}")]
    Framing(String),

    /// A text command contained non-ASCII characters.
    #[error("Command is not ASCII: {0:?}")]
    Encoding(String),

    /// The chip answered with content of an unexpected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The reset banner did not carry a `<major>.<minor>` version.
    #[error("Cannot parse firmware version from banner {banner:?}")]
    VersionParse { banner: String },

    /// The operation needs a transport capability that is not available.
    #[error("Transport {transport} does not support {capability}")]
    Capability {
        transport: String,
        capability: &'static str,
    },

    /// A value outside the accepted set was supplied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The chip firmware rejected the command with `?`.
    #[error("Command {command:?} is not supported by this ELM327 firmware")]
    UnsupportedCommand { command: String },

    /// The chip refused a baud-rate change before switching.
    #[error("Baud rate negotiation to {baud_rate} failed: chip answered {reply:?}")]
    Negotiation { baud_rate: u32, reply: String },

    /// The chip did not confirm a baud-rate change after the local switch.
    /// Both ends may now disagree on the link speed.
    #[error("Baud rate change to {baud_rate} was not confirmed: {reason}")]
    Confirmation { baud_rate: u32, reason: String },

    /// The transport failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

impl Elm327Error {
    /// Create a Framing error from a message.
    pub fn framing(message: impl Into<String>) -> Self {
        Self::Framing(message.into())
    }

    /// Create a Protocol error from a message.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Whether the link speed of the two ends may now disagree.
    pub fn may_be_desynchronized(&self) -> bool {
        matches!(self, Self::Framing(_) | Self::Confirmation { .. })
    }
}
