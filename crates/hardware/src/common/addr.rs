//! Block-granular address type.
//!
//! Stream tracking and prefetch requests operate on cache-line (block)
//! addresses rather than byte addresses. This module provides:
//! 1. **Type Safety:** Distinguishes block addresses from raw byte addresses at compile time.
//! 2. **Conversion:** Shifting between byte and block granularity for a given line size.
//! 3. **Stride Arithmetic:** Signed deltas and offsets with two's-complement wrapping.

use std::fmt;

/// An address expressed in units of one cache line.
///
/// A byte address `a` in a cache with `2^shift`-byte lines maps to block
/// `a >> shift`. Arithmetic wraps at the 64-bit boundary, so a descending
/// stream that walks below block zero continues from the top of the space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockAddr(pub u64);

impl BlockAddr {
    /// Creates a block address from a raw block number.
    #[inline(always)]
    pub const fn new(block: u64) -> Self {
        Self(block)
    }

    /// Returns the raw block number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Converts a byte address to its containing block.
    ///
    /// # Arguments
    ///
    /// * `addr` - The byte address.
    /// * `line_shift` - log2 of the cache line size in bytes.
    #[inline(always)]
    pub const fn from_byte_addr(addr: u64, line_shift: u32) -> Self {
        Self(addr >> line_shift)
    }

    /// Returns the byte address of the first byte in this block.
    #[inline(always)]
    pub const fn to_byte_addr(self, line_shift: u32) -> u64 {
        self.0 << line_shift
    }

    /// Returns this address moved by `delta` blocks (wrapping).
    #[inline(always)]
    pub const fn offset(self, delta: i64) -> Self {
        Self(self.0.wrapping_add_signed(delta))
    }

    /// Returns the signed distance `self - base` in blocks.
    ///
    /// The subtraction is performed in two's complement, so addresses on
    /// either side of each other yield the expected sign.
    #[inline(always)]
    pub const fn delta(self, base: Self) -> i64 {
        self.0.wrapping_sub(base.0) as i64
    }
}

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
