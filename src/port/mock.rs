//! Mock transport for testing.
//!
//! Provides a `MockSerialPort` that simulates an adapter without hardware.
//! Replies can be queued up front, scripted to appear after a given write, or
//! scripted to appear once the link is switched to a given speed, which is
//! what the baud-rate handshake needs.

use super::error::PortError;
use super::traits::{LinkSpeed, Transport};
use memchr::memmem;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Inner state of the mock port, shared between clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Log of all bytes written to the port, one entry per write call.
    write_log: Vec<Vec<u8>>,
    /// Expected write operations (for verification).
    expected_writes: VecDeque<Vec<u8>>,
    /// Scripted replies: when the next write matches the request, the reply
    /// is appended to the read queue.
    replies: VecDeque<(Vec<u8>, Vec<u8>)>,
    /// Bytes that become readable once the link is switched to a given speed.
    speed_replies: HashMap<u32, Vec<u8>>,
    /// Current link speed, `None` for a fixed-speed mock.
    link_speed: Option<u32>,
    /// Every speed the link was switched to, in order.
    speed_history: Vec<u32>,
    /// Whether the next operation should time out.
    should_timeout: bool,
    /// Configured timeout duration.
    timeout: Duration,
    /// Number of times the input buffer was flushed.
    flush_count: usize,
}

/// Mock transport implementation for testing.
///
/// Clones share state, so a test can keep one handle for inspection while the
/// driver owns another.
///
/// # Example
/// ```
/// use elm327::port::{MockSerialPort, Transport};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.respond_to(b"AT I\r\n", b"AT I\r\rELM327 v1.5\r\r>");
///
/// port.write_bytes(b"AT I\r\n").unwrap();
/// let frame = port.read_until(b">").unwrap();
/// assert_eq!(frame, b"AT I\r\rELM327 v1.5\r\r>");
/// assert_eq!(port.write_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// Shared internal state.
    state: Arc<Mutex<MockPortState>>,
    /// Speed handle used to hand out the [`LinkSpeed`] capability.
    speed: MockLinkSpeed,
}

/// [`LinkSpeed`] view over a mock port's shared state.
#[derive(Clone)]
struct MockLinkSpeed {
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a fixed-speed mock port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        let state = Arc::new(Mutex::new(MockPortState {
            timeout: Duration::from_secs(2),
            ..Default::default()
        }));
        Self {
            name: name.into(),
            speed: MockLinkSpeed {
                state: Arc::clone(&state),
            },
            state,
        }
    }

    /// Create a mock port whose link speed can be changed, starting at
    /// `baud_rate`.
    pub fn with_link_speed(name: impl Into<String>, baud_rate: u32) -> Self {
        let port = Self::new(name);
        port.state.lock().link_speed = Some(baud_rate);
        port
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Queue `reply` to become readable right after `request` is written.
    ///
    /// Scripts are consumed in order; a write that does not match the next
    /// script leaves it pending.
    pub fn respond_to(&mut self, request: &[u8], reply: &[u8]) {
        self.state
            .lock()
            .replies
            .push_back((request.to_vec(), reply.to_vec()));
    }

    /// Make `data` readable once the link is switched to `baud_rate`.
    pub fn respond_on_link_speed(&mut self, baud_rate: u32, data: &[u8]) {
        self.state
            .lock()
            .speed_replies
            .insert(baud_rate, data.to_vec());
    }

    /// Expect a specific write operation.
    ///
    /// Use `verify_expectations()` to check that all expected writes occurred.
    pub fn expect_write(&mut self, data: &[u8]) {
        self.state.lock().expected_writes.push_back(data.to_vec());
    }

    /// Verify that all expected writes have occurred in order.
    pub fn verify_expectations(&self) -> Result<(), String> {
        let state = self.state.lock();
        if !state.expected_writes.is_empty() {
            return Err(format!(
                "Expected {} more write(s), but none occurred",
                state.expected_writes.len()
            ));
        }
        Ok(())
    }

    /// Get a copy of all data written to the port.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().write_log.clone()
    }

    /// Number of write calls made so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().write_log.len()
    }

    /// Set whether the next read/write operation should time out.
    pub fn set_should_timeout(&mut self, should_timeout: bool) {
        self.state.lock().should_timeout = should_timeout;
    }

    /// Number of times the input buffer was flushed.
    pub fn flush_count(&self) -> usize {
        self.state.lock().flush_count
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }

    /// Current link speed, `None` for a fixed-speed mock.
    pub fn current_link_speed(&self) -> Option<u32> {
        self.state.lock().link_speed
    }

    /// Every speed the link was switched to, in order.
    pub fn speed_history(&self) -> Vec<u32> {
        self.state.lock().speed_history.clone()
    }

    fn take_timeout(state: &mut MockPortState) -> Result<(), PortError> {
        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(state.timeout));
        }
        Ok(())
    }
}

impl Transport for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();
        Self::take_timeout(&mut state)?;

        state.write_log.push(data.to_vec());

        if let Some(expected) = state.expected_writes.pop_front() {
            if expected != data {
                return Err(PortError::config(format!(
                    "Expected write: {:?}, got: {:?}",
                    expected, data
                )));
            }
        }

        if state
            .replies
            .front()
            .is_some_and(|(request, _)| request.as_slice() == data)
        {
            if let Some((_, reply)) = state.replies.pop_front() {
                state.read_queue.extend(reply);
            }
        }

        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();
        Self::take_timeout(&mut state)?;

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 && !buffer.is_empty() {
            // Nothing will ever arrive: behave like a real port hitting its timeout.
            Err(PortError::timeout(state.timeout))
        } else {
            Ok(bytes_read)
        }
    }

    fn flush_input(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock();
        state.read_queue.clear();
        state.flush_count += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn bytes_to_read(&self) -> Option<usize> {
        Some(self.state.lock().read_queue.len())
    }

    fn link_speed_control(&mut self) -> Option<&mut dyn LinkSpeed> {
        if self.state.lock().link_speed.is_some() {
            Some(&mut self.speed as &mut dyn LinkSpeed)
        } else {
            None
        }
    }

    fn read_until(&mut self, terminator: &[u8]) -> Result<Vec<u8>, PortError> {
        let mut state = self.state.lock();
        Self::take_timeout(&mut state)?;

        let queued = state.read_queue.make_contiguous();
        match memmem::find(queued, terminator) {
            Some(pos) => Ok(state.read_queue.drain(..pos + terminator.len()).collect()),
            None => {
                state.read_queue.clear();
                Err(PortError::timeout(state.timeout))
            }
        }
    }
}

impl LinkSpeed for MockLinkSpeed {
    fn link_speed(&self) -> Result<u32, PortError> {
        self.state
            .lock()
            .link_speed
            .ok_or_else(|| PortError::config("mock port has a fixed link speed"))
    }

    fn set_link_speed(&mut self, baud_rate: u32) -> Result<(), PortError> {
        let mut state = self.state.lock();
        state.link_speed = Some(baud_rate);
        state.speed_history.push(baud_rate);
        if let Some(data) = state.speed_replies.remove(&baud_rate) {
            state.read_queue.extend(data);
        }
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .field("link_speed", &self.current_link_speed())
            .finish()
    }
}
