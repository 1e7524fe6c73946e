//! Serial Transport
//!
//! Deadline-bounded byte transport over a duplex channel, normally a serial
//! port.
//!
//! A [`Transport`] holds at most one open [`ByteChannel`], acquired from a
//! [`ConnectionProvider`] when [`Transport::open`] is called and released by
//! [`Transport::close`].

mod client;
mod config;
mod error;
mod provider;
mod shared;
mod stream;

pub use client::{Counters, ReceiveOutcome, Transport, TransportState};
pub use config::{ConnectionConfig, DataBits, Parity, StopBits};
pub use error::{ErrorCategory, TransportError};
pub use provider::{
    list_ports, ConnectionProvider, PortEnumerator, PortInfo, SerialProvider, SystemPorts,
};
pub use shared::SharedTransport;
pub use stream::{ByteChannel, SerialChannel};

/// Default baud rate for new configurations
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default initial I/O timeout of a newly opened port, in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;

/// Default receive timeout used by interactive tools, in milliseconds
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u64 = 1000;

/// Default number of bytes requested per receive by interactive tools
pub const DEFAULT_RECEIVE_LEN: usize = 1024;
