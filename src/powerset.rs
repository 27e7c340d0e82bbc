//! Bit-indexed powerset enumeration with a minimum subset size.

use crate::props::PropSet;
use crate::symbol::PropId;
use smallvec::SmallVec;
use std::fmt;

/// Hard ceiling for bit-indexed enumeration: one bit per element of a u32
/// index. Filtered sets wider than this need a different existence-tracking
/// strategy and are surfaced as a scale error instead of being truncated.
pub const MAX_ENUM_WIDTH: usize = 32;

// Set-bit counts for every nibble value.
const NIBBLE_BITS: [u32; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

/// Number of set bits in `n`, by nibble-table lookup.
///
/// Runs once per generated subset, so it stays a table walk rather than a
/// per-bit loop.
pub fn count_set_bits(mut n: u32) -> u32 {
    let mut count = 0;
    while n != 0 {
        count += NIBBLE_BITS[(n & 0xf) as usize];
        n >>= 4;
    }
    count
}

/// The filtered declaration list is too wide to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumWidthError {
    pub width: usize,
}

impl fmt::Display for EnumWidthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements exceed the {}-element enumeration ceiling",
            self.width, MAX_ENUM_WIDTH
        )
    }
}

impl std::error::Error for EnumWidthError {}

/// Lazy enumeration of every subset of `elements` with at least `min_size`
/// members.
///
/// Enumerates integers `0..2^n`; bit `j` set means element `j` is included.
/// Each pass is independent; restart by constructing a new iterator.
#[derive(Debug)]
pub struct SubsetIter<'a> {
    elements: &'a [PropId],
    cursor: u64,
    end: u64,
    min_size: u32,
}

impl<'a> SubsetIter<'a> {
    /// `elements` must be sorted; the generated sets reuse its order.
    pub fn new(elements: &'a [PropId], min_size: usize) -> Result<Self, EnumWidthError> {
        if elements.len() > MAX_ENUM_WIDTH {
            return Err(EnumWidthError {
                width: elements.len(),
            });
        }
        debug_assert!(elements.windows(2).all(|w| w[0] < w[1]));
        Ok(Self {
            elements,
            cursor: 0,
            end: 1u64 << elements.len(),
            min_size: min_size as u32,
        })
    }
}

impl Iterator for SubsetIter<'_> {
    type Item = PropSet;

    fn next(&mut self) -> Option<PropSet> {
        while self.cursor < self.end {
            let bits = self.cursor as u32;
            self.cursor += 1;
            if count_set_bits(bits) < self.min_size {
                continue;
            }
            let mut items: SmallVec<[PropId; 8]> = SmallVec::new();
            for (j, &element) in self.elements.iter().enumerate() {
                if bits & (1 << j) != 0 {
                    items.push(element);
                }
            }
            return Some(PropSet::from_sorted(items));
        }
        None
    }
}
