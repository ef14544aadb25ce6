//! Dynamic rank/select over a mutable bit array.
//!
//! [`LineRankSelect`] keeps a packed `u64` bit array together with a
//! Fenwick tree over the popcounts of fixed-size blocks of `WORDS`
//! words. Rank decomposes into a tree prefix sum plus an in-block scan;
//! select locates the block with the tree's cumulative search and
//! finishes inside one word. Updates rewrite one word and push the
//! popcount delta through the tree, so the tree's view of the array
//! never goes stale.
//!
//! # Example
//!
//! ```
//! use compactly::{ByteFenwick, WordRankSelect};
//!
//! let mut rs = WordRankSelect::<ByteFenwick<7>>::new(vec![0b1011, 0, u64::MAX]);
//! assert_eq!(rs.rank(4), 3);
//! assert_eq!(rs.select(3), 128);
//!
//! let old = rs.update(1, 1 << 63);
//! assert_eq!(old, 0);
//! assert_eq!(rs.select(3), 127);
//! ```

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::broadword::select_in_word;
use crate::fenwick::{FenwickTree, leaf_bits};
use crate::popcount::popcount_word;

/// Rank/select dictionary with single-word blocks.
pub type WordRankSelect<T> = LineRankSelect<T, 1>;

/// A mutable rank/select dictionary over blocks of `WORDS` 64-bit words.
///
/// `WORDS` must be a power of two, and the tree's leaf width must match
/// the largest possible block popcount: `T::BITS == leaf_bits(64 * WORDS)`,
/// i.e. `7 + log2(WORDS)`. Both are checked at compile time when the
/// dictionary is built.
///
/// The dictionary owns the bit array; all mutation goes through
/// [`update`](Self::update) so the popcount tree stays consistent.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineRankSelect<T, const WORDS: usize> {
    tree: T,
    bitvector: Vec<u64>,
}

impl<T: FenwickTree, const WORDS: usize> LineRankSelect<T, WORDS> {
    /// Build a dictionary, taking ownership of the bit array.
    pub fn new(bitvector: Vec<u64>) -> Self {
        const {
            assert!(WORDS > 0 && WORDS.is_power_of_two(), "WORDS must be a power of two");
            assert!(
                T::BITS == leaf_bits(64 * WORDS as u64),
                "tree leaf width must cover the block popcount bound",
            );
        }
        debug_assert!(!bitvector.is_empty());
        let mut counts = alloc::vec![0u64; bitvector.len().div_ceil(WORDS)];
        for (i, &word) in bitvector.iter().enumerate() {
            counts[i / WORDS] += popcount_word(word) as u64;
        }
        Self {
            tree: T::from_increments(&counts),
            bitvector,
        }
    }

    /// Number of 1-bits in positions `[0, pos)`. `pos` may equal
    /// [`bits`](Self::bits).
    pub fn rank(&self, pos: usize) -> u64 {
        debug_assert!(pos <= self.bits());
        let block = pos / (64 * WORDS);
        let mut count = if block > 0 { self.tree.prefix_sum(block - 1) } else { 0 };
        for i in block * WORDS..pos / 64 {
            count += popcount_word(self.bitvector[i]) as u64;
        }
        if pos % 64 != 0 {
            count += (self.bitvector[pos / 64] & ((1u64 << (pos % 64)) - 1)).count_ones() as u64;
        }
        count
    }

    /// Number of 1-bits in positions `[from, to)`.
    #[inline]
    pub fn rank_range(&self, from: usize, to: usize) -> u64 {
        self.rank(to) - self.rank(from)
    }

    /// Number of 0-bits in positions `[0, pos)`.
    #[inline]
    pub fn rank_zero(&self, pos: usize) -> u64 {
        pos as u64 - self.rank(pos)
    }

    /// Number of 0-bits in positions `[from, to)`.
    #[inline]
    pub fn rank_zero_range(&self, from: usize, to: usize) -> u64 {
        (to - from) as u64 - self.rank_range(from, to)
    }

    /// Position of the `k+1`-th 1-bit, or [`bits`](Self::bits) if fewer
    /// than `k + 1` bits are set.
    pub fn select(&self, k: u64) -> usize {
        let block = self.tree.find(k);
        let mut remaining = k - if block > 0 { self.tree.prefix_sum(block - 1) } else { 0 };
        let start = block * WORDS;
        for i in start..(start + WORDS).min(self.bitvector.len()) {
            let ones = popcount_word(self.bitvector[i]) as u64;
            if remaining < ones {
                return i * 64 + select_in_word(self.bitvector[i], remaining as u32) as usize;
            }
            remaining -= ones;
        }
        self.bits()
    }

    /// Position of the `k+1`-th 0-bit, or [`bits`](Self::bits) if fewer
    /// than `k + 1` bits are clear.
    pub fn select_zero(&self, k: u64) -> usize {
        let block = self.tree.find_complement(k);
        let before = if block > 0 {
            (64 * WORDS * block) as u64 - self.tree.prefix_sum(block - 1)
        } else {
            0
        };
        let mut remaining = k - before;
        let start = block * WORDS;
        for i in start..(start + WORDS).min(self.bitvector.len()) {
            let zeros = popcount_word(!self.bitvector[i]) as u64;
            if remaining < zeros {
                return i * 64 + select_in_word(!self.bitvector[i], remaining as u32) as usize;
            }
            remaining -= zeros;
        }
        self.bits()
    }

    /// Replace the word at `idx`, returning the previous word.
    ///
    /// The popcount delta is pushed through the tree before returning,
    /// so queries issued afterwards see the new word.
    pub fn update(&mut self, idx: usize, word: u64) -> u64 {
        let old = core::mem::replace(&mut self.bitvector[idx], word);
        let delta = popcount_word(word) as i64 - popcount_word(old) as i64;
        self.tree.update(idx / WORDS, delta);
        old
    }

    /// Whether the bit at `pos` is set.
    #[inline]
    pub fn bit(&self, pos: usize) -> bool {
        self.bitvector[pos / 64] >> (pos % 64) & 1 == 1
    }

    /// The underlying words, read-only.
    #[inline]
    pub fn bitvector(&self) -> &[u64] {
        &self.bitvector
    }

    /// Length of the bit array in words.
    #[inline]
    pub fn len(&self) -> usize {
        self.bitvector.len()
    }

    /// Whether the bit array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitvector.is_empty()
    }

    /// Length of the bit array in bits.
    #[inline]
    pub fn bits(&self) -> usize {
        self.bitvector.len() * 64
    }

    /// Storage footprint in bits, including the popcount tree.
    pub fn bit_count(&self) -> usize {
        core::mem::size_of::<Self>() * 8 - core::mem::size_of::<T>() * 8
            + self.bits()
            + self.tree.bit_count()
    }
}
