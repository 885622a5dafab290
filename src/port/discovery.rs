//! Adapter discovery by USB vendor/product id.

use super::error::PortError;
use serialport::{available_ports, SerialPortInfo, SerialPortType};
use tracing::debug;

/// FTDI vendor id used by most USB ELM327 adapters.
pub const FTDI_VID: u16 = 0x0403;

/// FT232R product id.
pub const FT232R_PID: u16 = 0x6001;

/// List every serial port the system reports.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, PortError> {
    Ok(available_ports()?)
}

/// Return the name of the first port whose USB ids match `vid`/`pid`.
pub fn find_port(ports: &[SerialPortInfo], vid: u16, pid: u16) -> Option<&str> {
    ports.iter().find_map(|port| match &port.port_type {
        SerialPortType::UsbPort(usb) if usb.vid == vid && usb.pid == pid => {
            Some(port.port_name.as_str())
        }
        _ => None,
    })
}

/// Locate a connected adapter by USB vendor/product id.
pub fn find_adapter(vid: u16, pid: u16) -> Result<String, PortError> {
    let ports = list_ports()?;
    match find_port(&ports, vid, pid) {
        Some(name) => {
            debug!(port = name, "found ELM327 adapter");
            Ok(name.to_string())
        }
        None => Err(PortError::AdapterNotFound { vid, pid }),
    }
}
