//! Hexadecimal text conversion
//!
//! Output is always uppercase, two digits per byte. Input is accepted in
//! either case. Odd-length input is padded with one character according to
//! an [`Alignment`] before the digits are paired.

use serde::{Deserialize, Serialize};

use super::CodecError;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Which side of the value is kept flush when hex text has an odd length.
///
/// `Left` keeps the text flush left, so the padding goes on the right:
/// `"A02"` becomes `"A020"`. `Right` pads on the left: `"A02"` becomes
/// `"0A02"`. `None` rejects odd-length text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Pad on the right
    #[default]
    Left,
    /// Pad on the left
    Right,
    /// Reject odd-length text
    None,
}

/// Default padding character for odd-length hex text
pub const DEFAULT_PADDING: char = '0';

/// Encode bytes as uppercase hex, with `separator` between bytes.
///
/// The separator is never emitted after the last byte, and an empty
/// separator produces packed output.
///
/// ```
/// use portlink_core::codec::to_hex;
///
/// assert_eq!(to_hex(&[0x01, 0x20, 0x7F], ""), "01207F");
/// assert_eq!(to_hex(&[0x0A, 0x0B], " "), "0A 0B");
/// ```
pub fn to_hex(bytes: &[u8], separator: &str) -> String {
    let mut out = String::with_capacity(bytes.len() * (2 + separator.len()));
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0F) as usize] as char);
    }
    out
}

/// Encode a single byte as two uppercase hex digits
pub fn to_hex_byte(b: u8) -> String {
    to_hex(&[b], "")
}

/// Decode hex text into bytes.
///
/// Every character must be a hex digit. When the text has an odd length,
/// one `padding` character is added on the right for [`Alignment::Left`] or
/// on the left for [`Alignment::Right`]; [`Alignment::None`] fails with
/// [`CodecError::InvalidLength`]. Each pair decodes high nibble first.
pub fn from_hex(text: &str, alignment: Alignment, padding: char) -> Result<Vec<u8>, CodecError> {
    let mut nibbles = Vec::with_capacity(text.len() + 1);
    for (index, ch) in text.chars().enumerate() {
        let value = hex_digit_value(ch).ok_or(CodecError::InvalidHexChar { ch, index })?;
        nibbles.push(value);
    }

    if nibbles.len() % 2 == 1 {
        if alignment == Alignment::None {
            return Err(CodecError::InvalidLength(format!(
                "hex text has odd length {} and no alignment",
                nibbles.len()
            )));
        }
        let pad = hex_digit_value(padding).ok_or_else(|| {
            CodecError::InvalidFormat(format!("padding {:?} is not a hex digit", padding))
        })?;
        match alignment {
            Alignment::Right => nibbles.insert(0, pad),
            _ => nibbles.push(pad),
        }
    }

    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Decode hex text with left alignment and `'0'` padding
pub fn from_hex_default(text: &str) -> Result<Vec<u8>, CodecError> {
    from_hex(text, Alignment::Left, DEFAULT_PADDING)
}

/// Value of a single hex digit, case-insensitive
pub fn hex_digit_value(ch: char) -> Option<u8> {
    ch.to_digit(16).map(|d| d as u8)
}

/// Whether `text` is non-empty and made only of hex digits
pub fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_hexdigit())
}

/// Collapse ASCII hex digit bytes into bytes, two digits per byte.
///
/// `b"122a"` becomes `[0x12, 0x2A]`. The input length must be even.
pub fn shrink_ascii(ascii: &[u8]) -> Result<Vec<u8>, CodecError> {
    if ascii.len() % 2 != 0 {
        return Err(CodecError::InvalidLength(format!(
            "ASCII hex input must have even length, got {}",
            ascii.len()
        )));
    }

    ascii
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let digit = |offset: usize| {
                let ch = pair[offset] as char;
                hex_digit_value(ch).ok_or(CodecError::InvalidHexChar {
                    ch,
                    index: i * 2 + offset,
                })
            };
            Ok((digit(0)? << 4) | digit(1)?)
        })
        .collect()
}
