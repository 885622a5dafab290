//! Outbound AT commands.

use crate::error::{Elm327Error, Elm327Result};
use std::fmt;

/// Delimiter appended to every command on the wire.
pub const OUTBOUND_DELIMITER: &[u8] = b"\r\n";

const AT_PREFIX: &[u8] = b"AT";

/// A normalized AT command, always starting with `AT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(Vec<u8>);

impl Command {
    /// Build a command from raw bytes, prepending `AT ` when the prefix is
    /// missing.
    pub fn from_bytes(cmd: &[u8]) -> Self {
        if cmd.starts_with(AT_PREFIX) {
            Self(cmd.to_vec())
        } else {
            let mut normalized = Vec::with_capacity(cmd.len() + 3);
            normalized.extend_from_slice(b"AT ");
            normalized.extend_from_slice(cmd);
            Self(normalized)
        }
    }

    /// Build a command from text. Only ASCII is accepted.
    pub fn from_text(cmd: &str) -> Elm327Result<Self> {
        if !cmd.is_ascii() {
            return Err(Elm327Error::Encoding(cmd.to_string()));
        }
        Ok(Self::from_bytes(cmd.as_bytes()))
    }

    /// The command bytes, without delimiter.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The bytes written to the transport.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(self.0.len() + OUTBOUND_DELIMITER.len());
        wire.extend_from_slice(&self.0);
        wire.extend_from_slice(OUTBOUND_DELIMITER);
        wire
    }

    /// Extract the answer from a frame body.
    ///
    /// The chip echoes the command before answering; the echo and the line
    /// breaks that follow it are removed. With echo disabled (`AT E0`) the
    /// body is the answer already and only leading line breaks are dropped.
    pub fn payload<'a>(&self, body: &'a [u8]) -> &'a [u8] {
        let rest = body.strip_prefix(self.0.as_slice()).unwrap_or(body);
        let start = rest
            .iter()
            .position(|b| !matches!(b, b'\r' | b'\n'))
            .unwrap_or(rest.len());
        &rest[start..]
    }
}

impl TryFrom<&str> for Command {
    type Error = Elm327Error;

    fn try_from(cmd: &str) -> Elm327Result<Self> {
        Self::from_text(cmd)
    }
}

impl From<&[u8]> for Command {
    fn from(cmd: &[u8]) -> Self {
        Self::from_bytes(cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}
