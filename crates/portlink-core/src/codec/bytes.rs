//! Byte-range utilities
//!
//! Everything here returns a new sequence except [`reverse`] and
//! [`reverse_range`], which work in place.

use super::CodecError;

/// Concatenate zero or more byte sequences in order
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Copy out `length` bytes starting at `start`, clamping instead of failing.
///
/// - `start` negative or past the end, or `length` negative: empty result.
/// - `start + length` past the end: truncated to what is available.
///
/// Framing code leans on this to slice partially received data without
/// checking lengths first.
///
/// ```
/// use portlink_core::codec::sub_bytes;
///
/// assert_eq!(sub_bytes(&[1, 2, 3], 1, 10), vec![2, 3]);
/// assert!(sub_bytes(&[1, 2, 3], 5, 1).is_empty());
/// ```
pub fn sub_bytes(bytes: &[u8], start: isize, length: isize) -> Vec<u8> {
    if start < 0 || length < 0 {
        return Vec::new();
    }
    let start = start as usize;
    if start >= bytes.len() {
        return Vec::new();
    }
    let end = start.saturating_add(length as usize).min(bytes.len());
    bytes[start..end].to_vec()
}

/// [`sub_bytes`] from `start` to the end
pub fn sub_bytes_from(bytes: &[u8], start: isize) -> Vec<u8> {
    sub_bytes(bytes, start, bytes.len() as isize)
}

/// Reverse a byte sequence in place
pub fn reverse(bytes: &mut [u8]) {
    bytes.reverse();
}

/// Reverse `bytes[from..to]` in place
pub fn reverse_range(bytes: &mut [u8], from: usize, to: usize) -> Result<(), CodecError> {
    if from > to || to > bytes.len() {
        return Err(CodecError::InvalidLength(format!(
            "range {}..{} is out of bounds for {} bytes",
            from,
            to,
            bytes.len()
        )));
    }
    bytes[from..to].reverse();
    Ok(())
}

/// Index of the first `target` byte
pub fn index_of(bytes: &[u8], target: u8) -> Option<usize> {
    bytes.iter().position(|&b| b == target)
}

/// Index of the first occurrence of `needle`; an empty needle matches at 0
pub fn index_of_slice(bytes: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    bytes.windows(needle.len()).position(|w| w == needle)
}

/// Index of the last `target` byte
pub fn last_index_of(bytes: &[u8], target: u8) -> Option<usize> {
    bytes.iter().rposition(|&b| b == target)
}

/// Whether `target` appears anywhere in `bytes`
pub fn contains(bytes: &[u8], target: u8) -> bool {
    bytes.contains(&target)
}

/// Compare `a` and `b` over `start..start + length`.
///
/// False when either side is too short to cover the range.
pub fn range_equals(a: &[u8], b: &[u8], start: usize, length: usize) -> bool {
    let Some(end) = start.checked_add(length) else {
        return false;
    };
    if end > a.len() || end > b.len() {
        return false;
    }
    a[start..end] == b[start..end]
}
