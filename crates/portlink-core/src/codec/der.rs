//! DER length prefixes
//!
//! Short form: one byte for lengths below 0x80.
//! Long form: a 0x81 marker plus one byte up to 0xFF, or a 0x82 marker plus
//! two big-endian bytes up to 0xFFFF. Longer forms are not produced.

use byteorder::{BigEndian, ByteOrder};

use super::CodecError;

/// Largest length [`der_length`] encodes
pub const MAX_DER_LENGTH: usize = 0xFFFF;

const LONG_FORM_1: u8 = 0x81;
const LONG_FORM_2: u8 = 0x82;

/// Encode a DER length prefix.
///
/// ```
/// use portlink_core::codec::der_length;
///
/// assert_eq!(der_length(0x7F).unwrap(), vec![0x7F]);
/// assert_eq!(der_length(0x80).unwrap(), vec![0x81, 0x80]);
/// assert_eq!(der_length(0x100).unwrap(), vec![0x82, 0x01, 0x00]);
/// assert!(der_length(0x10000).is_err());
/// ```
pub fn der_length(value: usize) -> Result<Vec<u8>, CodecError> {
    match value {
        0..=0x7F => Ok(vec![value as u8]),
        0x80..=0xFF => Ok(vec![LONG_FORM_1, value as u8]),
        0x100..=MAX_DER_LENGTH => {
            let mut out = vec![LONG_FORM_2, 0, 0];
            BigEndian::write_u16(&mut out[1..], value as u16);
            Ok(out)
        }
        _ => Err(CodecError::ValueOutOfRange(value)),
    }
}

/// Decode a DER length prefix at the start of `bytes`.
///
/// Returns the length and the number of prefix bytes consumed. Accepts the
/// same three forms [`der_length`] produces.
pub fn decode_der_length(bytes: &[u8]) -> Result<(usize, usize), CodecError> {
    let first = *bytes
        .first()
        .ok_or_else(|| CodecError::InvalidLength("empty DER length".to_string()))?;

    match first {
        0x00..=0x7F => Ok((first as usize, 1)),
        LONG_FORM_1 => bytes
            .get(1)
            .map(|&b| (b as usize, 2))
            .ok_or_else(|| CodecError::InvalidLength("truncated DER length".to_string())),
        LONG_FORM_2 => {
            if bytes.len() < 3 {
                return Err(CodecError::InvalidLength(
                    "truncated DER length".to_string(),
                ));
            }
            Ok((BigEndian::read_u16(&bytes[1..3]) as usize, 3))
        }
        other => Err(CodecError::InvalidFormat(format!(
            "unsupported DER length marker {:#04x}",
            other
        ))),
    }
}
