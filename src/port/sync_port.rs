//! Synchronous serial transport.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own [`Transport`]
//! trait. A real serial port can change its speed on the fly, so it also
//! provides the [`LinkSpeed`] capability.

use super::error::PortError;
use super::traits::{LinkSpeed, PortConfiguration, Transport};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

/// Synchronous serial port wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
    /// Blocking-read timeout, reported back in [`PortError::Timeout`].
    timeout: Duration,
}

impl SyncSerialPort {
    /// Open a serial port with the given configuration (8N1, no flow control).
    ///
    /// # Example
    /// ```no_run
    /// use elm327::port::{PortConfiguration, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyUSB0", PortConfiguration::default())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: PortConfiguration) -> Result<Self, PortError> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .flow_control(serialport::FlowControl::None)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(config.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(port_name),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            })?;

        debug!(port = port_name, baud_rate = config.baud_rate, "opened serial port");

        Ok(Self {
            port,
            name: port_name.to_string(),
            timeout: config.timeout,
        })
    }

    fn map_io(&self, err: std::io::Error) -> PortError {
        match err.kind() {
            std::io::ErrorKind::TimedOut => PortError::timeout(self.timeout),
            _ => PortError::Io(err),
        }
    }
}

impl Transport for SyncSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        debug!(port = %self.name, data = ?String::from_utf8_lossy(data), "writing");
        self.port.write_all(data).map_err(|e| self.map_io(e))?;
        self.port.flush().map_err(|e| self.map_io(e))?;
        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(|e| self.map_io(e))
    }

    fn flush_input(&mut self) -> Result<(), PortError> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(PortError::Serial)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn bytes_to_read(&self) -> Option<usize> {
        self.port.bytes_to_read().ok().map(|n| n as usize)
    }

    fn link_speed_control(&mut self) -> Option<&mut dyn LinkSpeed> {
        Some(self as &mut dyn LinkSpeed)
    }

    fn read_until(&mut self, terminator: &[u8]) -> Result<Vec<u8>, PortError> {
        let mut data = Vec::new();
        let mut byte = [0u8; 1];
        while !data.ends_with(terminator) {
            match self.read_bytes(&mut byte)? {
                0 => return Err(PortError::Eof { received: data.len() }),
                _ => data.push(byte[0]),
            }
        }
        debug!(port = %self.name, data = ?String::from_utf8_lossy(&data), "read");
        Ok(data)
    }
}

impl LinkSpeed for SyncSerialPort {
    fn link_speed(&self) -> Result<u32, PortError> {
        self.port.baud_rate().map_err(PortError::Serial)
    }

    fn set_link_speed(&mut self, baud_rate: u32) -> Result<(), PortError> {
        self.port.set_baud_rate(baud_rate)?;
        debug!(port = %self.name, baud_rate, "link speed changed");
        Ok(())
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}
