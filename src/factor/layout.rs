//! The bit layout of a factor table.
//!
//! A factor over ```n``` variables stores ```2^n``` rows. The variable at scope position ```i```
//! (counted from the front) owns the ```i```-th most significant bit of an ```n```-bit row
//! index, and the bit holds the index of the variable's value in `DOMAIN`. Every operation that
//! decodes or builds row indices goes through this module.

use crate::variable::DOMAIN;

/// The offset, counted from the least significant bit, of scope position `position` in a row
/// index of `width` bits.
pub fn bit_offset(position: usize, width: usize) -> usize {
    debug_assert!(position < width);
    width - position - 1
}

/// The single-bit mask selecting scope position `position`
pub fn mask(position: usize, width: usize) -> usize {
    1 << bit_offset(position, width)
}

/// The bit (0 or 1) that scope position `position` holds in `row`
pub fn bit_at(row: usize, position: usize, width: usize) -> usize {
    (row >> bit_offset(position, width)) & 1
}

/// Number of rows in a table of `width` variables, or `None` if it does not fit a `usize`
pub fn row_count(width: usize) -> Option<usize> {
    if width >= usize::BITS as usize {
        None
    } else {
        Some(1 << width)
    }
}

/// The bit that encodes `value`
pub fn encode(value: bool) -> usize {
    if value == DOMAIN[0] { 0 } else { 1 }
}

/// The value encoded by `bit`
pub fn decode(bit: usize) -> bool {
    DOMAIN[bit & 1]
}

/// Compose a row index from per-position bits, most significant first.
pub fn row_of<I: IntoIterator<Item = usize>>(bits: I) -> usize {
    bits.into_iter().fold(0, |row, bit| (row << 1) | (bit & 1))
}
