//! Field-wise merge strategies.

use crate::{MergeError, Result};

/// How one bit of a flags field combines across fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bit {
    /// Set if set in any font.
    Any,
    /// Set only if set in every font.
    All,
    /// Taken from the first font.
    First,
}

pub(crate) fn first<T>(values: impl IntoIterator<Item = T>) -> Result<T> {
    values.into_iter().next().ok_or(MergeError::NoFonts)
}

pub(crate) fn max<T: Ord>(values: impl IntoIterator<Item = T>) -> Result<T> {
    values.into_iter().max().ok_or(MergeError::NoFonts)
}

pub(crate) fn min<T: Ord>(values: impl IntoIterator<Item = T>) -> Result<T> {
    values.into_iter().min().ok_or(MergeError::NoFonts)
}

/// Bitwise OR of every value, or `None` when no font has the field.
pub(crate) fn union<T: std::ops::BitOr<Output = T>>(values: impl IntoIterator<Item = T>) -> Option<T> {
    values.into_iter().reduce(|a, b| a | b)
}

/// Combine 16-bit flags, bit by bit, following `rules`.
pub(crate) fn merge_bits(values: &[u16], rules: &[Bit; 16]) -> Result<u16> {
    let head = *values.first().ok_or(MergeError::NoFonts)?;
    let merged = rules.iter().enumerate().fold(0u16, |acc, (bit, rule)| {
        let mask = 1u16 << bit;
        let set = match rule {
            Bit::Any => values.iter().any(|v| v & mask != 0),
            Bit::All => values.iter().all(|v| v & mask != 0),
            Bit::First => head & mask != 0,
        };
        if set { acc | mask } else { acc }
    });
    Ok(merged)
}
