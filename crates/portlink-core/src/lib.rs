//! # PortLink Core Library
//!
//! Byte codec and deadline-bounded serial transport.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Hex, integer, bit-string, checksum and DER length conversions
//! - A serial transport with deadline-bounded receive
//! - Port enumeration and JSON-loadable connection settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use portlink_core::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), TransportError> {
//! let config = ConnectionConfig::new("/dev/ttyUSB0").with_baud_rate(115200);
//!
//! let mut transport = Transport::serial();
//! transport.open(config)?;
//!
//! let mut frame = vec![0x02];
//! frame.extend_from_slice(&from_hex_default("3031")?);
//! frame.push(0x03);
//! frame.push(lrc(&frame[1..]));
//! transport.send(&frame)?;
//!
//! match transport.receive(16, Duration::from_millis(500))? {
//!     ReceiveOutcome::Complete(data) => println!("reply: {}", to_hex(&data, " ")),
//!     ReceiveOutcome::PartialOnTimeout(data) => println!("short reply: {}", to_hex(&data, " ")),
//! }
//! transport.close();
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod transport;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::codec::{
        concat, der_length, from_hex, from_hex_default, from_int, lrc, sub_bytes, to_hex,
        to_int, xor, Alignment, CodecError, Endianness,
    };
    pub use crate::transport::{
        ConnectionConfig, DataBits, Parity, ReceiveOutcome, StopBits, Transport,
        TransportError, TransportState,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
