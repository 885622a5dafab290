//! Core traits for the transport abstraction.
//!
//! The driver only needs a handful of byte-level primitives from the link it
//! talks over. [`Transport`] captures them so that a real serial port and the
//! scripted [`MockSerialPort`](super::MockSerialPort) can be used
//! interchangeably. Changing the link speed is a separate capability
//! ([`LinkSpeed`]) because not every transport has one.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default speed of an ELM327 straight out of reset.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Parameters used to open a serial transport.
///
/// ELM327 adapters always run 8N1 without flow control, so only the speed and
/// the blocking-read timeout are configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Read/write timeout.
    pub timeout: Duration,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(2),
        }
    }
}

/// Capability of a transport whose link speed can be changed at runtime.
pub trait LinkSpeed {
    /// Current link speed in bits per second.
    fn link_speed(&self) -> Result<u32, PortError>;

    /// Switch the local end of the link to a new speed.
    fn set_link_speed(&mut self, baud_rate: u32) -> Result<(), PortError>;
}

/// Byte-level transport consumed by the driver.
///
/// Implementors provide the primitives (`write_bytes`, `read_bytes`,
/// `flush_input`); the framed reads are built on top of them and may be
/// overridden when the transport can do better.
pub trait Transport: Send + std::fmt::Debug {
    /// Write bytes to the transport.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes into the provided buffer, blocking until at least one byte
    /// is available or the transport times out.
    ///
    /// Returns the number of bytes actually read. `Ok(0)` means end of stream.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Discard any unread bytes in the receive buffer.
    fn flush_input(&mut self) -> Result<(), PortError>;

    /// Get the name/path of this transport.
    fn name(&self) -> &str;

    /// Number of bytes that can be read without blocking, if known.
    fn bytes_to_read(&self) -> Option<usize> {
        None
    }

    /// Access the link speed capability.
    ///
    /// Returns `None` for fixed-speed transports.
    fn link_speed_control(&mut self) -> Option<&mut dyn LinkSpeed> {
        None
    }

    /// Read exactly `size` bytes.
    fn read_exact_bytes(&mut self, size: usize) -> Result<Vec<u8>, PortError> {
        let mut data = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            match self.read_bytes(&mut data[filled..])? {
                0 => return Err(PortError::Eof { received: filled }),
                n => filled += n,
            }
        }
        Ok(data)
    }

    /// Read until `terminator` has been received.
    ///
    /// The returned bytes include the terminator. Bytes are pulled one at a
    /// time so nothing past the terminator is consumed.
    fn read_until(&mut self, terminator: &[u8]) -> Result<Vec<u8>, PortError> {
        let mut data = Vec::new();
        let mut byte = [0u8; 1];
        while !data.ends_with(terminator) {
            match self.read_bytes(&mut byte)? {
                0 => return Err(PortError::Eof { received: data.len() }),
                _ => data.push(byte[0]),
            }
        }
        Ok(data)
    }

    /// Drain whatever is currently buffered without blocking.
    fn read_available(&mut self) -> Result<Vec<u8>, PortError> {
        let available = self.bytes_to_read().unwrap_or(0);
        if available == 0 {
            return Ok(Vec::new());
        }
        let mut data = vec![0u8; available];
        let n = self.read_bytes(&mut data)?;
        data.truncate(n);
        Ok(data)
    }
}
