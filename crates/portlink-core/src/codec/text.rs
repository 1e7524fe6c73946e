//! Text encodings built on the hex codec
//!
//! Only ISO-8859-1 is handled here, since it maps one character to one byte.
//! Other character sets are left to the caller.

use base64::{engine::general_purpose, Engine as _};

use super::{from_hex_default, to_hex, CodecError};

/// Encode text as ISO-8859-1 bytes.
///
/// Characters above U+00FF have no Latin-1 byte and fail.
pub fn encode_latin1(text: &str) -> Result<Vec<u8>, CodecError> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                CodecError::InvalidFormat(format!("{:?} is not an ISO-8859-1 character", c))
            })
        })
        .collect()
}

/// Decode ISO-8859-1 bytes; every byte maps to exactly one character
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Text to the hex of its ISO-8859-1 bytes: `"123"` becomes `"313233"`
pub fn extend(text: &str) -> Result<String, CodecError> {
    Ok(to_hex(&encode_latin1(text)?, ""))
}

/// Reverse of [`extend`]: `"313233"` becomes `"123"`
pub fn shrink(hex: &str) -> Result<String, CodecError> {
    Ok(decode_latin1(&from_hex_default(hex)?))
}

/// Standard base64 with padding
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64
pub fn from_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    Ok(general_purpose::STANDARD.decode(text)?)
}

/// Wrap bytes in a PEM block labelled `tag`.
///
/// The base64 body is written on a single line.
pub fn to_pem(tag: &str, bytes: &[u8]) -> String {
    format!(
        "-----BEGIN {tag}-----\n{}\n-----END {tag}-----",
        to_base64(bytes)
    )
}
