//! Transport layer for talking to the adapter.
//!
//! Provides the [`Transport`] trait the driver is written against, a real
//! serial implementation, a scripted mock, and USB discovery helpers.

pub mod discovery;
pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use discovery::{find_adapter, find_port, list_ports, FT232R_PID, FTDI_VID};
pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::SyncSerialPort;
pub use traits::{LinkSpeed, PortConfiguration, Transport, DEFAULT_BAUD_RATE};
