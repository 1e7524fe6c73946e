//! Byte Codec
//!
//! Stateless conversions between byte sequences and the representations
//! serial tooling deals in: hex text, endian-aware integers, bit strings,
//! XOR/LRC checksums, DER length prefixes and base64/PEM.
//!
//! All functions are pure and safe to call from any thread.

mod bits;
mod bytes;
mod checksum;
mod der;
mod error;
mod hex;
mod int;
mod text;

pub use bits::{from_bit_string, get_bit, to_bit_string, to_bit_string_bytes};
pub use bytes::{
    concat, contains, index_of, index_of_slice, last_index_of, range_equals, reverse,
    reverse_range, sub_bytes, sub_bytes_from,
};
pub use checksum::{lrc, xor, xor_byte};
pub use der::{decode_der_length, der_length, MAX_DER_LENGTH};
pub use error::CodecError;
pub use hex::{
    from_hex, from_hex_default, hex_digit_value, is_hex, shrink_ascii, to_hex, to_hex_byte,
    Alignment, DEFAULT_PADDING,
};
pub use int::{
    from_int, from_int4, from_int_default, to_int, to_int_default, Endianness, MAX_INT_BYTES,
};
pub use text::{
    decode_latin1, encode_latin1, extend, from_base64, shrink, to_base64, to_pem,
};
