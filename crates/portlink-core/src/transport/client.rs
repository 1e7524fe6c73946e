//! Transport client
//!
//! Owns at most one open channel and exposes open/send/receive/close.
//!
//! Receive is deadline-bounded: it returns as soon as the requested number
//! of bytes has arrived, hands back whatever did arrive once the deadline
//! passes, and fails only when the deadline passes with nothing at all.

use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{ByteChannel, ConnectionConfig, ConnectionProvider, SerialProvider, TransportError};
use crate::codec::{from_hex_default, to_hex};

/// Longest a single read may block, so cancellation is noticed promptly
const READ_SLICE: Duration = Duration::from_millis(20);

/// Pause after a read that returned nothing without blocking
const IDLE_POLL: Duration = Duration::from_millis(2);

/// Most bytes taken from the channel per read
const READ_CHUNK: usize = 1024;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No channel held
    Closed,
    /// Channel open and ready
    Open,
}

/// Successful result of a receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Exactly the requested number of bytes
    Complete(Vec<u8>),
    /// The deadline passed after some, but not all, bytes arrived
    PartialOnTimeout(Vec<u8>),
}

impl ReceiveOutcome {
    /// Bytes received, regardless of completeness
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Complete(b) | Self::PartialOnTimeout(b) => b,
        }
    }

    /// Take the received bytes
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Complete(b) | Self::PartialOnTimeout(b) => b,
        }
    }

    /// Whether every requested byte arrived
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Cumulative traffic counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Bytes written
    pub tx_bytes: u64,
    /// Bytes received
    pub rx_bytes: u64,
    /// Successful sends
    pub tx_frames: u64,
    /// Successful receives
    pub rx_frames: u64,
}

/// Client over one duplex byte channel
pub struct Transport {
    /// Opens channels on demand
    provider: Box<dyn ConnectionProvider>,
    /// Live channel while open
    channel: Option<Box<dyn ByteChannel>>,
    /// Configuration of the last successful open
    config: Option<ConnectionConfig>,
    counters: Counters,
}

impl Transport {
    /// Create a closed transport that opens channels through `provider`
    pub fn new(provider: impl ConnectionProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            channel: None,
            config: None,
            counters: Counters::default(),
        }
    }

    /// Create a closed transport backed by real serial ports
    pub fn serial() -> Self {
        Self::new(SerialProvider)
    }

    /// Get current state
    pub fn state(&self) -> TransportState {
        if self.channel.is_some() {
            TransportState::Open
        } else {
            TransportState::Closed
        }
    }

    /// Whether a channel is held
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Configuration of the current or most recent connection
    pub fn config(&self) -> Option<&ConnectionConfig> {
        self.config.as_ref()
    }

    /// Get cumulative tx/rx counters
    pub fn counters(&self) -> Counters {
        self.counters
    }

    fn port_label(&self) -> &str {
        self.config
            .as_ref()
            .map(|c| c.port_name.as_str())
            .unwrap_or("<closed>")
    }

    /// Open a channel for `config`.
    ///
    /// On failure the transport stays closed.
    pub fn open(&mut self, config: ConnectionConfig) -> Result<(), TransportError> {
        if self.channel.is_some() {
            return Err(TransportError::AlreadyOpen);
        }
        config.validate()?;

        let mut channel = self.provider.open_connection(&config)?;
        // Drop anything the device emitted before we were listening
        channel
            .clear_input_buffer()
            .map_err(|e| TransportError::Open(format!("clearing input failed: {}", e)))?;

        info!("opened {}", config.summary());
        self.channel = Some(channel);
        self.config = Some(config);
        Ok(())
    }

    /// Write and flush all of `data`.
    ///
    /// A missing channel or a write failure is reported as
    /// [`TransportError::Send`] but does not close the transport; the caller
    /// decides whether to retry or close.
    pub fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let channel = self
            .channel
            .as_mut()
            .ok_or_else(|| TransportError::Send("port not open".to_string()))?;

        let result = channel.write_all(data).and_then(|()| channel.flush());
        if let Err(e) = result {
            warn!("{}-Send failed: {}", self.port_label(), e);
            return Err(TransportError::Send(e.to_string()));
        }

        debug!("{}-Send: {}", self.port_label(), to_hex(data, " "));
        self.counters.tx_bytes = self.counters.tx_bytes.saturating_add(data.len() as u64);
        self.counters.tx_frames = self.counters.tx_frames.saturating_add(1);
        Ok(())
    }

    /// Decode hex text (left-aligned, `'0'` padded) and send it
    pub fn send_hex(&mut self, text: &str) -> Result<(), TransportError> {
        let data = from_hex_default(text)?;
        self.send(&data)
    }

    /// Receive up to `max_len` bytes within `timeout`.
    ///
    /// Checked in this order on every pass:
    /// 1. `max_len` bytes received: [`ReceiveOutcome::Complete`], at once.
    /// 2. `timeout` elapsed with nothing received: [`TransportError::Timeout`].
    /// 3. `timeout` elapsed with some bytes: [`ReceiveOutcome::PartialOnTimeout`].
    ///
    /// A read failure ends the call with [`TransportError::Stream`]; the
    /// transport stays open.
    pub fn receive(
        &mut self,
        max_len: usize,
        timeout: Duration,
    ) -> Result<ReceiveOutcome, TransportError> {
        self.receive_until(max_len, Instant::now() + timeout, None)
    }

    /// [`receive`](Self::receive) against an absolute deadline, with an
    /// optional cancellation flag.
    ///
    /// Setting `cancel` ends the call like an expired deadline, except that
    /// an empty result is [`TransportError::Cancelled`].
    pub fn receive_until(
        &mut self,
        max_len: usize,
        deadline: Instant,
        cancel: Option<&AtomicBool>,
    ) -> Result<ReceiveOutcome, TransportError> {
        let channel = self.channel.as_mut().ok_or(TransportError::NotOpen)?;
        let result = read_until(channel.as_mut(), max_len, deadline, cancel);

        let port = self.port_label();
        match &result {
            Ok(ReceiveOutcome::Complete(data)) => {
                debug!("{}-Read: {}", port, to_hex(data, " "));
            }
            Ok(ReceiveOutcome::PartialOnTimeout(data)) => {
                warn!(
                    "{}-Read: deadline reached with {} of {} bytes",
                    port,
                    data.len(),
                    max_len
                );
                debug!("{}-Read: {}", port, to_hex(data, " "));
            }
            Err(e) => debug!("{}-Read: {}", port, e),
        }

        if let Ok(outcome) = &result {
            let n = outcome.bytes().len() as u64;
            self.counters.rx_bytes = self.counters.rx_bytes.saturating_add(n);
            self.counters.rx_frames = self.counters.rx_frames.saturating_add(1);
        }
        result
    }

    /// Release the channel. Calling this while closed does nothing.
    ///
    /// Errors raised while releasing the device are logged and swallowed.
    pub fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.shutdown() {
                warn!("{}: error while closing (ignored): {}", self.port_label(), e);
            }
            info!("closed {}", self.port_label());
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::serial()
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Deadline-bounded accumulation of up to `max_len` bytes from `channel`.
///
/// The channel is always read at least once, so bytes already buffered are
/// returned even when the deadline has passed on entry. Each read is bounded
/// by the time left (capped at [`READ_SLICE`]) and takes up to
/// [`READ_CHUNK`] of the bytes still missing.
fn read_until(
    channel: &mut dyn ByteChannel,
    max_len: usize,
    deadline: Instant,
    cancel: Option<&AtomicBool>,
) -> Result<ReceiveOutcome, TransportError> {
    let mut received = Vec::with_capacity(max_len.min(READ_CHUNK));
    let mut chunk = [0u8; READ_CHUNK];
    let mut polled = false;

    loop {
        if received.len() == max_len {
            return Ok(ReceiveOutcome::Complete(received));
        }

        let now = Instant::now();
        let cancelled = cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
        if polled && (cancelled || now >= deadline) {
            if received.is_empty() {
                return Err(if cancelled {
                    TransportError::Cancelled
                } else {
                    TransportError::Timeout
                });
            }
            return Ok(ReceiveOutcome::PartialOnTimeout(received));
        }

        let slice = deadline.saturating_duration_since(now).min(READ_SLICE);
        channel
            .set_read_timeout(slice)
            .map_err(|e| TransportError::Stream(e.to_string()))?;

        let want = (max_len - received.len()).min(READ_CHUNK);
        match channel.read(&mut chunk[..want]) {
            Ok(0) => {
                let idle = IDLE_POLL.min(deadline.saturating_duration_since(Instant::now()));
                std::thread::sleep(idle);
            }
            Ok(n) => received.extend_from_slice(&chunk[..n]),
            Err(ref e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(e) => return Err(TransportError::Stream(e.to_string())),
        }
        polled = true;
    }
}
