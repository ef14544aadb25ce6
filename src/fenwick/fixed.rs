//! Baseline trees with one `u64` per node.
//!
//! No compression: every counter is a full machine word regardless of its
//! level. These are the reference the packed variants are measured
//! against, and the fastest choice when space does not matter.

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fenwick::{NodeArray, impl_fenwick_tree, level_count, tree_levels};

/// Fixed-width tree in level-major layout: all level-0 nodes, then all
/// level-1 nodes, and so on.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedFenwick<const BITS: usize> {
    tree: Vec<u64>,
    /// Word offset of each level; the last entry is the total node count.
    offset: Vec<usize>,
    size: usize,
}

impl<const BITS: usize> FixedFenwick<BITS> {
    fn with_size(size: usize) -> Self {
        let levels = tree_levels(size);
        debug_assert!(BITS + levels <= 64, "leaf width too large for this length");
        let mut offset = Vec::with_capacity(levels + 1);
        offset.push(0usize);
        for level in 0..levels {
            offset.push(offset[level] + level_count(size, level));
        }
        Self {
            tree: alloc::vec![0u64; offset[levels]],
            offset,
            size,
        }
    }

    #[inline]
    fn slot(&self, id: usize) -> usize {
        let height = id.trailing_zeros() as usize;
        self.offset[height] + (id >> (height + 1))
    }

    fn storage_bits(&self) -> usize {
        self.tree.len() * 64
    }
}

impl<const BITS: usize> NodeArray for FixedFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        self.tree[self.slot(id)]
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        let slot = self.slot(id);
        self.tree[slot] = self.tree[slot].wrapping_add(delta as u64);
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        let slot = self.slot(id);
        self.tree[slot] = value;
    }
}

impl_fenwick_tree!(FixedFenwick);

/// Fixed-width tree in the classical interleaved layout: node `id` lives
/// at word `id - 1`, the textbook Fenwick array.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterleavedFixedFenwick<const BITS: usize> {
    tree: Vec<u64>,
    size: usize,
}

impl<const BITS: usize> InterleavedFixedFenwick<BITS> {
    fn with_size(size: usize) -> Self {
        debug_assert!(BITS + tree_levels(size) <= 64, "leaf width too large for this length");
        Self {
            tree: alloc::vec![0u64; size],
            size,
        }
    }

    fn storage_bits(&self) -> usize {
        self.tree.len() * 64
    }
}

impl<const BITS: usize> NodeArray for InterleavedFixedFenwick<BITS> {
    const BITS: usize = BITS;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn node(&self, id: usize) -> u64 {
        self.tree[id - 1]
    }

    #[inline]
    fn node_add(&mut self, id: usize, delta: i64) {
        self.tree[id - 1] = self.tree[id - 1].wrapping_add(delta as u64);
    }

    #[inline]
    fn node_set(&mut self, id: usize, value: u64) {
        self.tree[id - 1] = value;
    }
}

impl_fenwick_tree!(InterleavedFixedFenwick);
