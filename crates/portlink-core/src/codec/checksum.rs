//! XOR and LRC checksums

use super::CodecError;

/// XOR two bytes
pub fn xor_byte(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Element-wise XOR of two equal-length sequences
pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>, CodecError> {
    if a.len() != b.len() {
        return Err(CodecError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| xor_byte(x, y)).collect())
}

/// Longitudinal redundancy check.
///
/// The first byte seeds the accumulator and every following byte is XORed
/// into it. An empty sequence yields zero.
///
/// ```
/// use portlink_core::codec::lrc;
///
/// assert_eq!(lrc(&[0x12]), 0x12);
/// assert_eq!(lrc(&[0x01, 0x02, 0x03]), 0x00);
/// ```
pub fn lrc(bytes: &[u8]) -> u8 {
    let mut iter = bytes.iter();
    let Some(&seed) = iter.next() else {
        return 0;
    };
    iter.fold(seed, |acc, &b| xor_byte(acc, b))
}
