//! Codec errors

use thiserror::Error;

/// Errors raised by the byte codec.
///
/// Every variant is a validation failure: the input was malformed or an
/// argument was out of range. None of them are worth retrying.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A character outside `0-9a-fA-F`
    #[error("Invalid hex character {ch:?} at index {index}")]
    InvalidHexChar {
        /// The offending character
        ch: char,
        /// Its position in the input
        index: usize,
    },

    /// Input or requested length not allowed here
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// More bytes than the conversion supports
    #[error("Length exceeded: {len} bytes, maximum is {max}")]
    LengthExceeded {
        /// Length given
        len: usize,
        /// Largest length accepted
        max: usize,
    },

    /// Operands of different lengths
    #[error("Length mismatch: {left} vs {right} bytes")]
    LengthMismatch {
        /// Length of the first operand
        left: usize,
        /// Length of the second operand
        right: usize,
    },

    /// Bit position outside `1..=8`
    #[error("Bit position must be between 1 and 8, got {0}")]
    InvalidPosition(u8),

    /// Text that does not follow the expected format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Value too large to encode
    #[error("Value out of range: {0:#x}")]
    ValueOutOfRange(usize),

    /// Malformed base64
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

