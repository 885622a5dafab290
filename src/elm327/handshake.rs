//! Baud-rate change handshake.
//!
//! `AT BRD` makes the chip answer `OK` at the old speed, switch, announce its
//! banner at the new speed and wait for a carriage return. If the carriage
//! return arrives it answers `OK` and stays at the new speed; otherwise it
//! falls back. The sequence cannot be retried blindly: once the local port
//! has switched, the two ends may already disagree on the rate.

use super::baud::BaudCandidate;
use super::driver::Elm327;
use super::frame::{Terminator, PROMPT};
use crate::error::{Elm327Error, Elm327Result};
use crate::port::Transport;
use tracing::{debug, info, warn};

const LINK_SPEED_CAPABILITY: &str = "link speed changes";

impl<T: Transport> Elm327<T> {
    /// Switch chip and transport to `baud_rate`.
    ///
    /// The rate must be one of [`BaudCandidate::ALL`]; anything else fails
    /// before any I/O.
    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Elm327Result<()> {
        let candidate = BaudCandidate::from_rate(baud_rate)?;
        self.change_baud(candidate)
    }

    /// Switch chip and transport to `candidate`.
    ///
    /// The change is not persistent: the chip returns to its default speed on
    /// power-up.
    pub fn change_baud(&mut self, candidate: BaudCandidate) -> Elm327Result<()> {
        let _entered = self.span.clone().entered();

        if self.transport.link_speed_control().is_none() {
            return Err(missing_speed_control(self.transport.name()));
        }
        let (Some(terminator), Some(banner)) =
            (self.session.terminator, self.session.banner.clone())
        else {
            return Err(Elm327Error::protocol(
                "adapter identity unknown; reset before changing the baud rate",
            ));
        };

        let baud_rate = candidate.rate();
        let command = candidate.command();
        let t = terminator.as_bytes();

        // Requesting: echo line, then the verdict, both at the old speed.
        self.transport.write_bytes(&command.to_wire())?;
        let echo = self.transport.read_until(t)?;
        let reply = self.transport.read_until(t)?;
        let reply = reply.strip_suffix(t).unwrap_or(&reply);
        debug!(echo = %echo.escape_ascii(), reply = %reply.escape_ascii(), "AT BRD answered");

        if reply == b"?" {
            self.discard_pending()?;
            return Err(Elm327Error::UnsupportedCommand {
                command: command.to_string(),
            });
        }
        if reply != b"OK" {
            self.discard_pending()?;
            return Err(Elm327Error::Negotiation {
                baud_rate,
                reply: reply.escape_ascii().to_string(),
            });
        }

        // Switching: from here on the local end listens at the new rate.
        let transport_name = self.transport.name().to_string();
        match self.transport.link_speed_control() {
            Some(control) => control.set_link_speed(baud_rate)?,
            None => return Err(missing_speed_control(&transport_name)),
        }

        // A transport failure past this point means the chip never answered
        // at the new rate, which is a failed confirmation.
        self.confirm_switch(baud_rate, terminator, banner)
            .map_err(|e| match e {
                Elm327Error::Port(err) => {
                    warn!(baud_rate, error = %err, "no answer at the new rate");
                    Elm327Error::Confirmation {
                        baud_rate,
                        reason: err.to_string(),
                    }
                }
                other => other,
            })?;
        self.session.link_speed = Some(baud_rate);

        info!(baud_rate, "baud rate changed (not permanent)");
        Ok(())
    }

    /// Confirming and committed steps, run at the new rate.
    fn confirm_switch(
        &mut self,
        baud_rate: u32,
        terminator: Terminator,
        banner: String,
    ) -> Elm327Result<()> {
        let t = terminator.as_bytes();

        // The chip re-announces itself at the new rate.
        let announce = self.transport.read_until(t)?;
        let mut expected = banner.into_bytes();
        expected.extend_from_slice(t);
        if !announce.ends_with(&expected) {
            warn!(baud_rate, announce = %announce.escape_ascii(), "banner mismatch after switch");
            return Err(Elm327Error::Confirmation {
                baud_rate,
                reason: format!("expected banner, got \"{}\"", announce.escape_ascii()),
            });
        }

        self.transport.write_bytes(b"\r")?;
        let ack = self.transport.read_exact_bytes(2)?;
        if ack != b"OK" {
            warn!(baud_rate, ack = %ack.escape_ascii(), "switch not acknowledged");
            return Err(Elm327Error::Confirmation {
                baud_rate,
                reason: format!("expected OK, got \"{}\"", ack.escape_ascii()),
            });
        }

        // Committed: consume the rest of the reply up to the prompt.
        self.read_frame()?;
        Ok(())
    }

    /// Consume the rest of a refused request so the session stays usable at
    /// the old speed.
    ///
    /// The chip always closes a refusal with its prompt, so this blocks until
    /// the prompt arrives, then drops anything else already buffered.
    fn discard_pending(&mut self) -> Elm327Result<()> {
        let tail = self.transport.read_until(&[PROMPT])?;
        let stale = self.transport.read_available()?;
        debug!(
            tail = %tail.escape_ascii(),
            stale = %stale.escape_ascii(),
            "discarded rest of refused request"
        );
        Ok(())
    }
}

fn missing_speed_control(transport: &str) -> Elm327Error {
    Elm327Error::Capability {
        transport: transport.to_string(),
        capability: LINK_SPEED_CAPABILITY,
    }
}
