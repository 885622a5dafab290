//! Utility functions for hardware testing.

use elm327::port::{list_ports, PortConfiguration};
use elm327::{Elm327, SyncSerialPort};
use serialport::SerialPortType;
use std::env;
use std::time::{Duration, Instant};

/// Test adapter configuration from environment.
pub struct TestAdapterConfig {
    pub port_name: String,
    pub baud_rate: u32,
}

impl TestAdapterConfig {
    /// Read `TEST_PORT` and `TEST_BAUD` (default 38400).
    pub fn from_env() -> Option<Self> {
        let port_name = env::var("TEST_PORT").ok()?;
        let baud_rate = env::var("TEST_BAUD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(elm327::port::DEFAULT_BAUD_RATE);

        Some(TestAdapterConfig {
            port_name,
            baud_rate,
        })
    }

    pub fn to_port_config(&self) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate,
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Open the adapter named by `TEST_PORT`, or print why the test is skipped.
pub fn open_test_adapter() -> Option<Elm327<SyncSerialPort>> {
    let Some(config) = TestAdapterConfig::from_env() else {
        println!("Skipping hardware test: TEST_PORT not set");
        return None;
    };

    println!(
        "Opening adapter on {} at {} baud",
        config.port_name, config.baud_rate
    );
    match Elm327::open(&config.port_name, config.to_port_config()) {
        Ok(elm) => Some(elm),
        Err(e) => panic!("failed to open adapter on {}: {e}", config.port_name),
    }
}

/// Print available ports for debugging.
pub fn print_available_ports() {
    let ports = list_ports().unwrap_or_default();
    if ports.is_empty() {
        println!("No serial ports detected on this system");
        return;
    }

    println!("Available serial ports ({}):", ports.len());
    for port in &ports {
        match &port.port_type {
            SerialPortType::UsbPort(usb) => {
                println!("  {}  USB {:04x}:{:04x}", port.port_name, usb.vid, usb.pid)
            }
            other => println!("  {}  {:?}", port.port_name, other),
        }
    }
}

/// Timing helper for measuring operation duration.
pub struct TimingHelper {
    start: Instant,
    name: String,
}

impl TimingHelper {
    pub fn new(name: &str) -> Self {
        println!("Starting: {}", name);
        TimingHelper {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        println!("Completed: {} in {:?}", self.name, elapsed);
        elapsed
    }
}
