//! Endian-aware integer conversion
//!
//! Integers travel as 1 to 4 bytes. Big endian is the default, matching
//! the length fields used by most framed serial protocols.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use super::CodecError;

/// Widest integer, in bytes, the codec converts
pub const MAX_INT_BYTES: usize = 4;

/// Byte order within a multi-byte integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    /// Most-significant byte first
    #[default]
    Big,
    /// Least-significant byte first
    Little,
}

/// Read an unsigned integer from up to four bytes.
///
/// An empty slice reads as zero. More than four bytes fails with
/// [`CodecError::LengthExceeded`].
///
/// ```
/// use portlink_core::codec::{to_int, Endianness};
///
/// assert_eq!(to_int(&[1, 2, 3], Endianness::Big).unwrap(), 66051);
/// assert_eq!(to_int(&[1, 2], Endianness::Little).unwrap(), 513);
/// ```
pub fn to_int(bytes: &[u8], endian: Endianness) -> Result<u32, CodecError> {
    if bytes.len() > MAX_INT_BYTES {
        return Err(CodecError::LengthExceeded {
            len: bytes.len(),
            max: MAX_INT_BYTES,
        });
    }
    if bytes.is_empty() {
        return Ok(0);
    }

    let value = match endian {
        Endianness::Big => BigEndian::read_uint(bytes, bytes.len()),
        Endianness::Little => LittleEndian::read_uint(bytes, bytes.len()),
    };
    Ok(value as u32)
}

/// Big-endian [`to_int`]
pub fn to_int_default(bytes: &[u8]) -> Result<u32, CodecError> {
    to_int(bytes, Endianness::Big)
}

/// Write the `length` lowest-order bytes of `value`.
///
/// `length` must be in `1..=4`; higher-order bytes that do not fit are
/// dropped, so `from_int(0x0102_0304, 2, Big)` is `[0x03, 0x04]`.
pub fn from_int(value: u32, length: usize, endian: Endianness) -> Result<Vec<u8>, CodecError> {
    if !(1..=MAX_INT_BYTES).contains(&length) {
        return Err(CodecError::InvalidLength(format!(
            "integer length must be in [1, {}], got {}",
            MAX_INT_BYTES, length
        )));
    }

    let mask = (1u64 << (length * 8)) - 1;
    let truncated = u64::from(value) & mask;

    let mut out = vec![0u8; length];
    match endian {
        Endianness::Big => BigEndian::write_uint(&mut out, truncated, length),
        Endianness::Little => LittleEndian::write_uint(&mut out, truncated, length),
    }
    Ok(out)
}

/// Big-endian [`from_int`]
pub fn from_int_default(value: u32, length: usize) -> Result<Vec<u8>, CodecError> {
    from_int(value, length, Endianness::Big)
}

/// `value` as four big-endian bytes
pub fn from_int4(value: u32) -> [u8; 4] {
    let mut out = [0u8; 4];
    BigEndian::write_u32(&mut out, value);
    out
}
