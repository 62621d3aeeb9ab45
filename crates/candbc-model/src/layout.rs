//! Bit-level signal layout.
//!
//! Little-endian ("Intel") signals occupy the contiguous bit range
//! `[start, start + size)` with bit `n` meaning bit `n % 8` of byte
//! `n / 8`.
//!
//! Big-endian ("Motorola") signals name the most significant bit of
//! their first occupied byte as the start bit, and the bit numbering
//! inverts within each byte as the signal crosses byte boundaries. The
//! layout for the canonical six-signal example:
//!
//! ```text
//!       7   6   5   4   3   2   1   0
//!   0 | Signal 1      | Signal 2 MSB  |    start=7 len=4 / start=3 len=8
//!   1 | Signal 2 LSB  | Signal 3 MSB  |    start=11 len=6
//!   2 | Sig 3 | Signal 4              |    start=21 len=6
//!   3 | Signal 5                      |    start=31 len=8
//!   4 | Signal 6 MSB                  |    start=39 len=32
//!   5 |                               |
//!   6 |                               |
//!   7 |                  Signal 6 LSB |
//! ```
//!
//! [`inverse_bit_position`] maps a Motorola bit position into the
//! contiguous-from-MSB numbering, which makes both the bounds check and
//! the byte span of a signal directly computable.

use crate::signal::ByteOrder;

/// Map a Motorola bit position into contiguous-from-MSB numbering.
///
/// The byte index is preserved; the bit index within the byte is
/// mirrored: `inverse(p) = ((p>>3)<<3) + ((8 - ((p+1) & 7)) & 7)`.
pub fn inverse_bit_position(pos: u32) -> u32 {
    let byte_base = (pos >> 3) << 3;
    let bit_in_byte = (8 - (pos.wrapping_add(1) & 7)) & 7;
    byte_base + bit_in_byte
}

/// Does a signal with the given layout fit into a message of
/// `message_bytes` bytes?
pub fn signal_fits(byte_order: ByteOrder, start_bit: u32, size: u32, message_bytes: u32) -> bool {
    // Widened so absurd declared sizes compare instead of overflowing.
    let limit = 8 * u64::from(message_bytes);
    let size = u64::from(size);
    match byte_order {
        ByteOrder::LittleEndian => u64::from(start_bit) + size <= limit,
        ByteOrder::BigEndian => u64::from(inverse_bit_position(start_bit)) + size <= limit,
    }
}

/// First payload byte occupied by a signal.
pub fn first_occupied_byte(byte_order: ByteOrder, start_bit: u32) -> u32 {
    match byte_order {
        ByteOrder::LittleEndian => start_bit >> 3,
        ByteOrder::BigEndian => inverse_bit_position(start_bit) >> 3,
    }
}

/// Last payload byte occupied by a signal.
pub fn last_occupied_byte(byte_order: ByteOrder, start_bit: u32, size: u32) -> u32 {
    match byte_order {
        ByteOrder::LittleEndian => (start_bit + size - 1) >> 3,
        ByteOrder::BigEndian => (inverse_bit_position(start_bit) + size - 1) >> 3,
    }
}

/// Extract the raw value of a big-endian signal from a payload.
///
/// Bytes missing from the payload read as zero; `size` must be 1..=64.
pub fn extract_big_endian(payload: &[u8], start_bit: u32, size: u32) -> u64 {
    debug_assert!((1..=64).contains(&size));
    let begin = inverse_bit_position(start_bit);
    let end = begin + size - 1;
    let first = (begin >> 3) as usize;
    let last = (end >> 3) as usize;

    // Accumulate the occupied bytes most significant first, then drop
    // the trailing bits of the boundary byte.
    let mut acc: u128 = 0;
    for index in first..=last {
        acc = (acc << 8) | u128::from(payload.get(index).copied().unwrap_or(0));
    }
    let shift = 7 - (end & 7);
    mask_to(acc >> shift, size)
}

/// Extract the raw value of a little-endian signal from a payload.
///
/// Bytes missing from the payload read as zero; `size` must be 1..=64.
pub fn extract_little_endian(payload: &[u8], start_bit: u32, size: u32) -> u64 {
    debug_assert!((1..=64).contains(&size));
    let first = (start_bit >> 3) as usize;
    let last = ((start_bit + size - 1) >> 3) as usize;

    let mut acc: u128 = 0;
    for index in (first..=last).rev() {
        acc = (acc << 8) | u128::from(payload.get(index).copied().unwrap_or(0));
    }
    mask_to(acc >> (start_bit & 7), size)
}

/// Extract the raw value of a signal with the given byte order.
pub fn extract_raw(byte_order: ByteOrder, payload: &[u8], start_bit: u32, size: u32) -> u64 {
    match byte_order {
        ByteOrder::BigEndian => extract_big_endian(payload, start_bit, size),
        ByteOrder::LittleEndian => extract_little_endian(payload, start_bit, size),
    }
}

fn mask_to(value: u128, size: u32) -> u64 {
    if size >= 64 {
        value as u64
    } else {
        (value & ((1u128 << size) - 1)) as u64
    }
}
