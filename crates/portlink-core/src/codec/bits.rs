//! Bit access and bit-string text
//!
//! Bit positions count from 1 at the most-significant bit to 8 at the
//! least-significant bit, the way protocol tables usually number them.

use super::CodecError;

/// Whether the bit at `position` (1 = MSB, 8 = LSB) is set
pub fn get_bit(value: u8, position: u8) -> Result<bool, CodecError> {
    if !(1..=8).contains(&position) {
        return Err(CodecError::InvalidPosition(position));
    }
    Ok((value >> (8 - position)) & 0x01 == 1)
}

/// A byte as eight `'0'`/`'1'` characters, MSB first
pub fn to_bit_string(value: u8) -> String {
    format!("{:08b}", value)
}

/// Concatenated [`to_bit_string`] of every byte
pub fn to_bit_string_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| to_bit_string(b)).collect()
}

/// Parse `'0'`/`'1'` text back into bytes, eight characters per byte.
///
/// The text must be non-empty with a length divisible by 8.
pub fn from_bit_string(text: &str) -> Result<Vec<u8>, CodecError> {
    if text.is_empty() || text.len() % 8 != 0 {
        return Err(CodecError::InvalidFormat(format!(
            "bit string length must be a non-zero multiple of 8, got {}",
            text.len()
        )));
    }

    text.as_bytes()
        .chunks_exact(8)
        .map(|group| {
            group.iter().try_fold(0u8, |acc, &c| match c {
                b'0' => Ok(acc << 1),
                b'1' => Ok((acc << 1) | 1),
                other => Err(CodecError::InvalidFormat(format!(
                    "bit string contains {:?}",
                    other as char
                ))),
            })
        })
        .collect()
}
