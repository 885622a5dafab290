//! The protocol driver.

use super::command::Command;
use super::frame::{detect_terminator, strip_frame, Terminator, PROMPT};
use super::version::FirmwareVersion;
use crate::error::Elm327Result;
use crate::port::{PortConfiguration, SyncSerialPort, Transport};
use tracing::{debug, info, info_span, Span};

/// State learned about the chip during one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(super) terminator: Option<Terminator>,
    pub(super) link_speed: Option<u32>,
    pub(super) version: Option<FirmwareVersion>,
    pub(super) banner: Option<String>,
}

impl Session {
    /// Reply terminator, once the first reply has been seen.
    pub fn terminator(&self) -> Option<Terminator> {
        self.terminator
    }

    /// Link speed, `None` on a fixed-speed transport.
    pub fn link_speed(&self) -> Option<u32> {
        self.link_speed
    }

    /// Firmware version from the last successful reset.
    pub fn version(&self) -> Option<FirmwareVersion> {
        self.version
    }

    /// Welcome banner from the last successful reset.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }
}

/// Driver for an ELM327 chip behind a [`Transport`].
///
/// Every operation is a blocking round trip and takes `&mut self`; share a
/// driver between threads by wrapping it in a mutex.
///
/// # Example
/// ```
/// use elm327::{Elm327, MockSerialPort};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.respond_to(b"AT Z\r\n", b"AT Z\r\n\r\nELM327 v1.5\r\n\r\n>");
/// port.respond_to(b"AT RV\r\n", b"AT RV\r\n12.4V\r\n\r\n>");
///
/// let mut elm = Elm327::new(port)?;
/// assert_eq!(elm.version().unwrap().to_string(), "1.5");
/// assert_eq!(elm.send_command("RV")?, b"12.4V");
/// # Ok::<(), elm327::Elm327Error>(())
/// ```
#[derive(Debug)]
pub struct Elm327<T: Transport> {
    pub(super) transport: T,
    pub(super) session: Session,
    pub(super) span: Span,
}

impl Elm327<SyncSerialPort> {
    /// Open a serial port and reset the adapter behind it.
    pub fn open(port_name: &str, config: PortConfiguration) -> Elm327Result<Self> {
        let port = SyncSerialPort::open(port_name, config)?;
        Self::new(port)
    }
}

impl<T: Transport> Elm327<T> {
    /// Take over `transport` and reset the chip to learn its identity.
    pub fn new(transport: T) -> Elm327Result<Self> {
        let mut elm = Self::attach(transport);
        elm.reset()?;
        Ok(elm)
    }

    /// Take over `transport` without talking to the chip.
    ///
    /// The terminator is learned from the first reply; the version stays
    /// unknown until [`reset`](Self::reset) is called.
    pub fn attach(mut transport: T) -> Self {
        let span = info_span!("elm327", port = %transport.name());
        let link_speed = transport
            .link_speed_control()
            .and_then(|control| control.link_speed().ok());
        Self {
            transport,
            session: Session {
                link_speed,
                ..Session::default()
            },
            span,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn version(&self) -> Option<FirmwareVersion> {
        self.session.version
    }

    pub fn banner(&self) -> Option<&str> {
        self.session.banner()
    }

    pub fn terminator(&self) -> Option<Terminator> {
        self.session.terminator
    }

    pub fn link_speed(&self) -> Option<u32> {
        self.session.link_speed
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give the transport back, e.g. to reopen it at another speed.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Software-reset the chip (`AT Z`) and record its banner and version.
    ///
    /// Pending input is discarded first, so this is also the way to resync
    /// after a suspected desync.
    pub fn reset(&mut self) -> Elm327Result<FirmwareVersion> {
        let _entered = self.span.clone().entered();
        info!("reset");

        self.session.version = None;
        self.session.banner = None;

        self.transport.flush_input()?;
        let payload = self.dispatch(&Command::from_bytes(b"AT Z"))?;

        // Non-ASCII noise is occasionally seen right after a reset.
        let banner: String = payload
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| char::from(b))
            .collect();
        let version = FirmwareVersion::parse_banner(&banner)?;

        info!(banner = %banner, %version, "adapter identified");
        self.session.banner = Some(banner);
        self.session.version = Some(version);
        Ok(version)
    }

    /// Send a text command and return the chip's answer.
    ///
    /// `AT ` is prepended when the command does not already start with `AT`.
    pub fn send_command(&mut self, cmd: &str) -> Elm327Result<Vec<u8>> {
        let command = Command::from_text(cmd)?;
        self.dispatch(&command)
    }

    /// Send a command given as raw bytes and return the chip's answer.
    pub fn send_raw(&mut self, cmd: &[u8]) -> Elm327Result<Vec<u8>> {
        self.dispatch(&Command::from_bytes(cmd))
    }

    /// Write `command`, read one frame and return the answer without the echo.
    pub fn dispatch(&mut self, command: &Command) -> Elm327Result<Vec<u8>> {
        let _entered = self.span.clone().entered();

        self.transport.write_bytes(&command.to_wire())?;
        let body = self.read_frame()?;
        let payload = command.payload(&body).to_vec();

        debug!(%command, payload = %payload.escape_ascii(), "command answered");
        Ok(payload)
    }

    /// Read one reply frame up to the prompt and return its body.
    ///
    /// The first frame of a session fixes the terminator; every frame must
    /// then end with it twice followed by the prompt.
    pub fn read_frame(&mut self) -> Elm327Result<Vec<u8>> {
        let mut frame = self.transport.read_until(&[PROMPT])?;

        let terminator = match self.session.terminator {
            Some(terminator) => terminator,
            None => {
                let terminator = detect_terminator(&frame)?;
                debug!(%terminator, "reply terminator detected");
                self.session.terminator = Some(terminator);
                terminator
            }
        };

        let body_len = strip_frame(&frame, terminator)?.len();
        frame.truncate(body_len);
        Ok(frame)
    }
}
