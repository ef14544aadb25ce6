//! Bit-packed trees.
//!
//! The tightest packing: a level-`l` node takes exactly `BITS + l` bits,
//! enough for the largest value it can hold (`2^(BITS+l-1)`, when every
//! leaf below it sits at the bound). Nodes of a level form a contiguous
//! bitstream; levels are concatenated. A node is read with one unaligned
//! 64-bit load from the byte containing its first bit, a shift by the
//! in-byte offset, and a mask.
//!
//! Updates add the shifted delta into the whole window. The low bits of
//! the window below the node belong to a neighbor but are never
//! disturbed: the shifted delta is zero there, and a borrow cannot
//! propagate below the node because true counters never go negative.
//!
//! The node width plus the in-byte shift must fit one 64-bit window,
//! which caps `BITS + levels` at 58.

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fenwick::{
    NodeArray, TAIL_BYTES, bit_mask, impl_fenwick_tree, level_count, load_u64, store_u64,
    tree_levels,
};

/// Bit-packed tree in level-major layout with precomputed per-level bit
/// offsets.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitFenwick<const BITS: usize> {
    tree: Vec<u8>,
    /// Bit offset of each level; the last entry is the payload bit size.
    offset: Vec<usize>,
    size: usize,
}

impl<const BITS: usize> BitFenwick<BITS> {
    fn with_size(size: usize) -> Self {
        let levels = tree_levels(size);
        debug_assert!(BITS + levels <= 58, "leaf width too large for this length");
        let mut offset = Vec::with_capacity(levels + 1);
        offset.push(0usize);
        for level in 0..levels {
            offset.push(offset[level] + level_count(size, level) * (BITS + level));
        }
        Self {
            tree: alloc::vec![0u8; offset[levels].div_ceil(8) + TAIL_BYTES],
            offset,
            size,
        }
    }

    /// Bit position and width of node `id`.
    #[inline]
    fn position(&self, id: usize) -> (usize, usize) {
        let height = id.trailing_zeros() as usize;
        let width = BITS + height;
        (self.offset[height] + (id >> (height + 1)) * width, width)
    }

    fn storage_bits(&self) -> usize {
        self.offset[self.offset.len() - 1]
    }
}

impl<const BITS: usize> NodeArray for BitFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        let (pos, width) = self.position(id);
        (load_u64(&self.tree, pos >> 3) >> (pos & 7)) & bit_mask(width)
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        let (pos, _) = self.position(id);
        let window = load_u64(&self.tree, pos >> 3);
        store_u64(
            &mut self.tree,
            pos >> 3,
            window.wrapping_add((delta as u64) << (pos & 7)),
        );
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        let (pos, width) = self.position(id);
        let shift = pos & 7;
        let mask = bit_mask(width) << shift;
        let window = load_u64(&self.tree, pos >> 3);
        store_u64(
            &mut self.tree,
            pos >> 3,
            (window & !mask) | ((value << shift) & mask),
        );
    }
}

impl_fenwick_tree!(BitFenwick);

/// Bit-packed tree in interleaved layout.
///
/// Node `id` starts at bit `(id-1)(BITS+1) - popcount(id-1)`: each
/// earlier node contributes `BITS` plus its level, and levels summed over
/// `1..id` telescope to `id - 1 - popcount(id - 1)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterleavedBitFenwick<const BITS: usize> {
    tree: Vec<u8>,
    size: usize,
}

impl<const BITS: usize> InterleavedBitFenwick<BITS> {
    fn with_size(size: usize) -> Self {
        debug_assert!(BITS + tree_levels(size) <= 58, "leaf width too large for this length");
        Self {
            tree: alloc::vec![0u8; Self::bit_position(size + 1).div_ceil(8) + TAIL_BYTES],
            size,
        }
    }

    /// Bit offset of node `id`; `size + 1` yields the payload bit size.
    #[inline]
    fn bit_position(id: usize) -> usize {
        let before = id - 1;
        before * (BITS + 1) - before.count_ones() as usize
    }

    fn storage_bits(&self) -> usize {
        Self::bit_position(self.size + 1)
    }
}

impl<const BITS: usize> NodeArray for InterleavedBitFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        let pos = Self::bit_position(id);
        let width = BITS + id.trailing_zeros() as usize;
        (load_u64(&self.tree, pos >> 3) >> (pos & 7)) & bit_mask(width)
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        let pos = Self::bit_position(id);
        let window = load_u64(&self.tree, pos >> 3);
        store_u64(
            &mut self.tree,
            pos >> 3,
            window.wrapping_add((delta as u64) << (pos & 7)),
        );
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        let pos = Self::bit_position(id);
        let width = BITS + id.trailing_zeros() as usize;
        let shift = pos & 7;
        let mask = bit_mask(width) << shift;
        let window = load_u64(&self.tree, pos >> 3);
        store_u64(
            &mut self.tree,
            pos >> 3,
            (window & !mask) | ((value << shift) & mask),
        );
    }
}

impl_fenwick_tree!(InterleavedBitFenwick);
