//! Tests against a real ELM327 adapter.
//!
//! ```bash
//! export TEST_PORT=/dev/ttyUSB0   # or COM3 on Windows
//! export TEST_BAUD=38400          # optional, default: 38400
//! cargo test --features hardware-tests -- --ignored
//! ```
//!
//! The baud-rate test leaves the adapter at the new speed until it is
//! power-cycled.

use super::utils::{open_test_adapter, print_available_ports, TimingHelper};
use elm327::Elm327Error;
use serial_test::serial;

#[test]
#[ignore]
#[serial]
fn test_reset_identifies_adapter() {
    print_available_ports();
    let Some(mut elm) = open_test_adapter() else {
        return;
    };

    let timing = TimingHelper::new("reset");
    let version = elm.reset().unwrap();
    timing.finish();

    println!("Banner: {:?}, version {version}", elm.banner());
    assert!(elm.banner().unwrap().starts_with("ELM327"));
    assert!(elm.terminator().is_some());
}

#[test]
#[ignore]
#[serial]
fn test_identify_twice() {
    let Some(mut elm) = open_test_adapter() else {
        return;
    };

    let first = elm.send_command("I").unwrap();
    let second = elm.send_command("I").unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with(b"ELM327"));
}

#[test]
#[ignore]
#[serial]
fn test_read_voltage() {
    let Some(mut elm) = open_test_adapter() else {
        return;
    };

    let answer = elm.send_command("RV").unwrap();
    println!("Voltage: {}", String::from_utf8_lossy(&answer));
    assert!(answer.ends_with(b"V"));
}

#[test]
#[ignore]
#[serial]
fn test_switch_to_115200() {
    let Some(mut elm) = open_test_adapter() else {
        return;
    };

    let timing = TimingHelper::new("baud switch");
    match elm.set_baud_rate(115_200) {
        Ok(()) => {
            timing.finish();
            assert_eq!(elm.link_speed(), Some(115_200));
            assert!(!elm.send_command("I").unwrap().is_empty());
        }
        Err(Elm327Error::UnsupportedCommand { .. }) => {
            println!("Adapter firmware does not support AT BRD");
        }
        Err(e) => panic!("baud switch failed: {e}"),
    }
}
