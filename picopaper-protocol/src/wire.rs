//! Byte-level wire encoding
//!
//! One protocol byte is `START` followed by two hexadecimal characters.
//! The device accepts either case; the host sends lowercase.

/// Marks the beginning of an encoded byte
pub const START_CHAR: u8 = b':';

/// Resets the device receive state, recognised in any state
pub const RESET_CHAR: u8 = b'/';

/// Hex characters per encoded byte
pub const HEX_PAIR_LEN: usize = 2;

/// Wire characters per encoded byte (start + hex pair)
pub const ENCODED_BYTE_LEN: usize = 1 + HEX_PAIR_LEN;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Value of a single hexadecimal character
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decode a pair of hexadecimal characters into one byte
///
/// Both characters must be hex digits. Signs, prefixes and whitespace are
/// rejected.
pub fn decode_hex_pair(pair: [u8; HEX_PAIR_LEN]) -> Option<u8> {
    let high = hex_value(pair[0])?;
    let low = hex_value(pair[1])?;
    Some((high << 4) | low)
}

/// Encode one byte as `:hh`
pub fn encode_byte(byte: u8) -> [u8; ENCODED_BYTE_LEN] {
    [
        START_CHAR,
        HEX_DIGITS[(byte >> 4) as usize],
        HEX_DIGITS[(byte & 0x0F) as usize],
    ]
}
