//! Byte-packed trees.
//!
//! A level-`l` counter needs `BITS + l` bits, so it is stored in
//! `(BITS + l - 1) / 8 + 1` bytes: the smallest whole number of bytes
//! with at least one slack bit of headroom. Nodes are accessed as
//! unaligned 64-bit windows masked down to the node's width; updates add
//! into the whole window, which is safe because the slack headroom
//! absorbs any carry and a true counter never goes negative, so borrows
//! never leave the node's bytes either.
//!
//! The buffer keeps [`TAIL_BYTES`] of zeroed slack after the last node so
//! the 8-byte window of every node stays in bounds.

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fenwick::{
    NodeArray, TAIL_BYTES, byte_mask, impl_fenwick_tree, level_count, load_u64, store_u64,
    tree_levels,
};

/// Bytes occupied by a node on `level` of a tree with `bits`-wide leaves.
#[inline]
const fn stride(bits: usize, level: usize) -> usize {
    (bits + level - 1) / 8 + 1
}

/// Byte-packed tree in level-major layout.
///
/// Per-level byte offsets are computed once at construction; the node
/// with in-level index `k` on level `l` starts at `offset[l] + k * stride(l)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ByteFenwick<const BITS: usize> {
    tree: Vec<u8>,
    /// Byte offset of each level; the last entry is the payload size.
    offset: Vec<usize>,
    size: usize,
}

impl<const BITS: usize> ByteFenwick<BITS> {
    fn with_size(size: usize) -> Self {
        let levels = tree_levels(size);
        debug_assert!(BITS + levels <= 64, "leaf width too large for this length");
        let mut offset = Vec::with_capacity(levels + 1);
        offset.push(0usize);
        for level in 0..levels {
            offset.push(offset[level] + level_count(size, level) * stride(BITS, level));
        }
        Self {
            tree: alloc::vec![0u8; offset[levels] + TAIL_BYTES],
            offset,
            size,
        }
    }

    #[inline]
    fn position(&self, id: usize) -> (usize, usize) {
        let height = id.trailing_zeros() as usize;
        let width = stride(BITS, height);
        (self.offset[height] + (id >> (height + 1)) * width, width)
    }

    fn storage_bits(&self) -> usize {
        self.offset[self.offset.len() - 1] * 8
    }
}

impl<const BITS: usize> NodeArray for ByteFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        let (pos, width) = self.position(id);
        load_u64(&self.tree, pos) & byte_mask(width)
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        let (pos, _) = self.position(id);
        let window = load_u64(&self.tree, pos);
        store_u64(&mut self.tree, pos, window.wrapping_add(delta as u64));
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        let (pos, width) = self.position(id);
        let mask = byte_mask(width);
        let window = load_u64(&self.tree, pos);
        store_u64(&mut self.tree, pos, (window & !mask) | (value & mask));
    }
}

impl_fenwick_tree!(ByteFenwick);

/// Byte-packed tree in interleaved layout: nodes laid out in increasing
/// identifier order, each with its level's stride.
///
/// The byte position of a node is closed-form: every earlier node
/// contributes the base stride, and one extra byte for each stride
/// growth level at or below its own. Stride growth happens every 8
/// levels, so the position costs a handful of shifts.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterleavedByteFenwick<const BITS: usize> {
    tree: Vec<u8>,
    size: usize,
}

impl<const BITS: usize> InterleavedByteFenwick<BITS> {
    /// Stride of a leaf node.
    const BASE: usize = stride(BITS, 0);

    /// First level whose stride is one byte wider than the leaf stride.
    const STEP: usize = {
        let rem = (BITS - 1) % 8;
        if rem == 0 { 8 } else { 8 - rem }
    };

    fn with_size(size: usize) -> Self {
        debug_assert!(BITS + tree_levels(size) <= 64, "leaf width too large for this length");
        Self {
            tree: alloc::vec![0u8; Self::byte_position(size + 1) + TAIL_BYTES],
            size,
        }
    }

    /// Byte offset of node `id`; `size + 1` yields the payload size.
    #[inline]
    fn byte_position(id: usize) -> usize {
        let before = id - 1;
        let mut pos = before * Self::BASE;
        let mut growth = Self::STEP;
        while growth < usize::BITS as usize {
            pos += before >> growth;
            growth += 8;
        }
        pos
    }

    fn storage_bits(&self) -> usize {
        Self::byte_position(self.size + 1) * 8
    }
}

impl<const BITS: usize> NodeArray for InterleavedByteFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        let width = stride(BITS, id.trailing_zeros() as usize);
        load_u64(&self.tree, Self::byte_position(id)) & byte_mask(width)
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        let pos = Self::byte_position(id);
        let window = load_u64(&self.tree, pos);
        store_u64(&mut self.tree, pos, window.wrapping_add(delta as u64));
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        let pos = Self::byte_position(id);
        let mask = byte_mask(stride(BITS, id.trailing_zeros() as usize));
        let window = load_u64(&self.tree, pos);
        store_u64(&mut self.tree, pos, (window & !mask) | (value & mask));
    }
}

impl_fenwick_tree!(InterleavedByteFenwick);
