//! ELM327 protocol driver.
//!
//! - `frame`: reply framing and terminator detection
//! - `command`: command normalization and answer extraction
//! - `version`: reset banner parsing
//! - `baud`: `AT BRD` rate table
//! - `driver`: the [`Elm327`] driver and its [`Session`]
//! - `handshake`: the baud-rate change sequence

pub mod baud;
pub mod command;
pub mod driver;
pub mod frame;
mod handshake;
pub mod version;

pub use baud::BaudCandidate;
pub use command::{Command, OUTBOUND_DELIMITER};
pub use driver::{Elm327, Session};
pub use frame::{detect_terminator, strip_frame, Terminator, PROMPT};
pub use version::{FirmwareVersion, BANNER_PREFIX};
