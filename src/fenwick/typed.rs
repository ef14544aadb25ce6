//! Type-segregated trees.
//!
//! Levels are bucketed into four native integer arrays by counter width:
//! levels whose `BITS + l` fits 8 bits live in a `u8` array, then `u16`,
//! `u32` and `u64`. No bit manipulation on access — every node is a
//! native aligned element — at the cost of rounding each level up to the
//! next machine type.

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fenwick::{NodeArray, impl_fenwick_tree, level_count, tree_levels};

/// First level whose counters no longer fit `cap` bits.
const fn split(bits: usize, cap: usize) -> usize {
    if bits <= cap { cap - bits + 1 } else { 0 }
}

/// Type-segregated tree in level-major layout.
///
/// `base[l]` is the index of level `l`'s first node within its bucket
/// array.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypedFenwick<const BITS: usize> {
    t8: Vec<u8>,
    t16: Vec<u16>,
    t32: Vec<u32>,
    t64: Vec<u64>,
    base: Vec<usize>,
    size: usize,
}

impl<const BITS: usize> TypedFenwick<BITS> {
    fn with_size(size: usize) -> Self {
        let levels = tree_levels(size);
        debug_assert!(BITS + levels <= 64, "leaf width too large for this length");
        let mut base = Vec::with_capacity(levels);
        let mut lens = [0usize; 4];
        for level in 0..levels {
            let bucket = Self::bucket(level);
            base.push(lens[bucket]);
            lens[bucket] += level_count(size, level);
        }
        Self {
            t8: alloc::vec![0u8; lens[0]],
            t16: alloc::vec![0u16; lens[1]],
            t32: alloc::vec![0u32; lens[2]],
            t64: alloc::vec![0u64; lens[3]],
            base,
            size,
        }
    }

    #[inline]
    const fn bucket(level: usize) -> usize {
        match BITS + level {
            ..=8 => 0,
            ..=16 => 1,
            ..=32 => 2,
            _ => 3,
        }
    }

    #[inline]
    fn slot(&self, id: usize) -> (usize, usize) {
        let height = id.trailing_zeros() as usize;
        (height, self.base[height] + (id >> (height + 1)))
    }

    fn storage_bits(&self) -> usize {
        self.t8.len() * 8 + self.t16.len() * 16 + self.t32.len() * 32 + self.t64.len() * 64
    }
}

impl<const BITS: usize> NodeArray for TypedFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        let (height, slot) = self.slot(id);
        match Self::bucket(height) {
            0 => self.t8[slot] as u64,
            1 => self.t16[slot] as u64,
            2 => self.t32[slot] as u64,
            _ => self.t64[slot],
        }
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        let (height, slot) = self.slot(id);
        match Self::bucket(height) {
            0 => self.t8[slot] = self.t8[slot].wrapping_add(delta as u8),
            1 => self.t16[slot] = self.t16[slot].wrapping_add(delta as u16),
            2 => self.t32[slot] = self.t32[slot].wrapping_add(delta as u32),
            _ => self.t64[slot] = self.t64[slot].wrapping_add(delta as u64),
        }
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        let (height, slot) = self.slot(id);
        match Self::bucket(height) {
            0 => self.t8[slot] = value as u8,
            1 => self.t16[slot] = value as u16,
            2 => self.t32[slot] = value as u32,
            _ => self.t64[slot] = value,
        }
    }
}

impl_fenwick_tree!(TypedFenwick);

/// Type-segregated tree in interleaved layout.
///
/// Within each bucket, nodes keep increasing identifier order. The
/// position of node `id` inside its bucket is the number of earlier
/// nodes whose level falls in the bucket's level range `[a, b)`:
/// `((id-1) >> a) - ((id-1) >> b)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterleavedTypedFenwick<const BITS: usize> {
    t8: Vec<u8>,
    t16: Vec<u16>,
    t32: Vec<u32>,
    t64: Vec<u64>,
    size: usize,
}

impl<const BITS: usize> InterleavedTypedFenwick<BITS> {
    const SPLIT8: usize = split(BITS, 8);
    const SPLIT16: usize = split(BITS, 16);
    const SPLIT32: usize = split(BITS, 32);

    fn with_size(size: usize) -> Self {
        debug_assert!(BITS + tree_levels(size) <= 64, "leaf width too large for this length");
        Self {
            t8: alloc::vec![0u8; size - (size >> Self::SPLIT8)],
            t16: alloc::vec![0u16; (size >> Self::SPLIT8) - (size >> Self::SPLIT16)],
            t32: alloc::vec![0u32; (size >> Self::SPLIT16) - (size >> Self::SPLIT32)],
            t64: alloc::vec![0u64; size >> Self::SPLIT32],
            size,
        }
    }

    /// Bucket index and in-bucket position of node `id`.
    #[inline]
    fn slot(id: usize) -> (usize, usize) {
        let height = id.trailing_zeros() as usize;
        let before = id - 1;
        if height < Self::SPLIT8 {
            (0, before - (before >> Self::SPLIT8))
        } else if height < Self::SPLIT16 {
            (1, (before >> Self::SPLIT8) - (before >> Self::SPLIT16))
        } else if height < Self::SPLIT32 {
            (2, (before >> Self::SPLIT16) - (before >> Self::SPLIT32))
        } else {
            (3, before >> Self::SPLIT32)
        }
    }

    fn storage_bits(&self) -> usize {
        self.t8.len() * 8 + self.t16.len() * 16 + self.t32.len() * 32 + self.t64.len() * 64
    }
}

impl<const BITS: usize> NodeArray for InterleavedTypedFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        match Self::slot(id) {
            (0, slot) => self.t8[slot] as u64,
            (1, slot) => self.t16[slot] as u64,
            (2, slot) => self.t32[slot] as u64,
            (_, slot) => self.t64[slot],
        }
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        match Self::slot(id) {
            (0, slot) => self.t8[slot] = self.t8[slot].wrapping_add(delta as u8),
            (1, slot) => self.t16[slot] = self.t16[slot].wrapping_add(delta as u16),
            (2, slot) => self.t32[slot] = self.t32[slot].wrapping_add(delta as u32),
            (_, slot) => self.t64[slot] = self.t64[slot].wrapping_add(delta as u64),
        }
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        match Self::slot(id) {
            (0, slot) => self.t8[slot] = value as u8,
            (1, slot) => self.t16[slot] = value as u16,
            (2, slot) => self.t32[slot] = value as u32,
            (_, slot) => self.t64[slot] = value,
        }
    }
}

impl_fenwick_tree!(InterleavedTypedFenwick);
