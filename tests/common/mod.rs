//! Shared test utilities for the driver integration tests.
//!
//! Builders for scripted mock adapters and the reply frames they send.

#![allow(dead_code)]

use elm327::{BaudCandidate, LinkSpeed, MockSerialPort, PortError, Terminator, Transport};
use std::collections::VecDeque;
use std::time::Duration;

/// Banner announced by the adapter in these tests.
pub const BANNER: &str = "ELM327 v1.5";

/// Speed the mock adapter starts at.
pub const START_BAUD: u32 = 38_400;

/// Build a full reply frame: echo, answer, then the doubled terminator and
/// the prompt.
///
/// # Example
/// ```ignore
/// let reply = frame(Terminator::Cr, "AT I", "?");
/// assert_eq!(reply, b"AT I\r\r?\r\r>");
/// ```
pub fn frame(terminator: Terminator, echo: &str, answer: &str) -> Vec<u8> {
    let t = terminator.as_bytes();
    let mut reply = Vec::new();
    reply.extend_from_slice(echo.as_bytes());
    reply.extend_from_slice(t);
    reply.extend_from_slice(t);
    reply.extend_from_slice(answer.as_bytes());
    reply.extend_from_slice(terminator.frame_suffix());
    reply
}

/// Wire form of a command as the driver writes it.
pub fn wire(command: &str) -> Vec<u8> {
    format!("{command}\r\n").into_bytes()
}

/// Create a fixed-speed mock adapter that answers `AT Z` with [`BANNER`].
pub fn create_fixed_speed_adapter(terminator: Terminator) -> MockSerialPort {
    let mut port = MockSerialPort::new("MOCK0");
    port.respond_to(&wire("AT Z"), &frame(terminator, "AT Z", BANNER));
    port
}

/// Create a mock adapter with an adjustable link speed that answers `AT Z`
/// with [`BANNER`].
pub fn create_adjustable_adapter(terminator: Terminator) -> MockSerialPort {
    let mut port = MockSerialPort::with_link_speed("MOCK0", START_BAUD);
    port.respond_to(&wire("AT Z"), &frame(terminator, "AT Z", BANNER));
    port
}

/// Script the `AT BRD` request for `candidate` to be answered with `verdict`.
pub fn script_baud_request(
    port: &mut MockSerialPort,
    terminator: Terminator,
    candidate: BaudCandidate,
    verdict: &str,
) {
    let t = terminator.as_bytes();
    let command = candidate.command().to_string();
    let mut reply = command.clone().into_bytes();
    reply.extend_from_slice(t);
    reply.extend_from_slice(verdict.as_bytes());
    reply.extend_from_slice(t);
    if verdict != "OK" {
        // A refused request is followed by a blank line and the prompt.
        reply.extend_from_slice(t);
        reply.push(b'>');
    }
    port.respond_to(&wire(&command), &reply);
}

/// Script a complete, successful switch to `candidate`.
pub fn script_successful_switch(
    port: &mut MockSerialPort,
    terminator: Terminator,
    candidate: BaudCandidate,
) {
    script_baud_request(port, terminator, candidate, "OK");
    script_announce(port, terminator, candidate, BANNER);
    script_ack(port, terminator, "OK");
}

/// Make `banner` readable once the link runs at `candidate`'s rate.
pub fn script_announce(
    port: &mut MockSerialPort,
    terminator: Terminator,
    candidate: BaudCandidate,
    banner: &str,
) {
    let mut data = banner.as_bytes().to_vec();
    data.extend_from_slice(terminator.as_bytes());
    port.respond_on_link_speed(candidate.rate(), &data);
}

/// Script the answer to the confirming carriage return.
pub fn script_ack(port: &mut MockSerialPort, terminator: Terminator, ack: &str) {
    let mut reply = ack.as_bytes().to_vec();
    reply.extend_from_slice(terminator.frame_suffix());
    port.respond_to(b"\r", &reply);
}

/// Adapter whose replies arrive in separate chunks.
///
/// Each write releases the next scripted reply. Only the chunk currently
/// being read counts as buffered; later chunks arrive when a blocking read
/// needs them, the way bytes trickle in on a real serial line.
#[derive(Debug)]
pub struct ChunkedAdapter {
    replies: VecDeque<Vec<Vec<u8>>>,
    in_flight: VecDeque<Vec<u8>>,
    buffered: VecDeque<u8>,
    link_speed: u32,
}

impl ChunkedAdapter {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            in_flight: VecDeque::new(),
            buffered: VecDeque::new(),
            link_speed: START_BAUD,
        }
    }

    /// Queue the chunks answering the next write.
    pub fn reply_in_chunks(&mut self, chunks: &[&[u8]]) {
        self.replies
            .push_back(chunks.iter().map(|chunk| chunk.to_vec()).collect());
    }
}

impl Default for ChunkedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ChunkedAdapter {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        if let Some(chunks) = self.replies.pop_front() {
            self.in_flight.extend(chunks);
        }
        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        if self.buffered.is_empty() {
            match self.in_flight.pop_front() {
                Some(chunk) => self.buffered.extend(chunk),
                None => return Err(PortError::timeout(Duration::from_secs(2))),
            }
        }
        let n = buffer.len().min(self.buffered.len());
        for (slot, byte) in buffer.iter_mut().zip(self.buffered.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn flush_input(&mut self) -> Result<(), PortError> {
        self.buffered.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "CHUNKED0"
    }

    fn bytes_to_read(&self) -> Option<usize> {
        Some(self.buffered.len())
    }

    fn link_speed_control(&mut self) -> Option<&mut dyn LinkSpeed> {
        Some(self as &mut dyn LinkSpeed)
    }
}

impl LinkSpeed for ChunkedAdapter {
    fn link_speed(&self) -> Result<u32, PortError> {
        Ok(self.link_speed)
    }

    fn set_link_speed(&mut self, baud_rate: u32) -> Result<(), PortError> {
        self.link_speed = baud_rate;
        Ok(())
    }
}
