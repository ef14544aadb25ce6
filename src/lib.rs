//! # Compactly
//!
//! Compressed Fenwick trees and a dynamic rank/select dictionary for Rust.
//!
//! This crate provides a family of space-compressed Fenwick trees (binary
//! indexed trees) over sequences of bounded nonnegative increments, and a
//! mutable rank/select bit dictionary built on top of them. A counter
//! near the leaves of a Fenwick tree never exceeds a small bound while a
//! counter near the root needs a full word; the packed variants here size
//! each level's storage to exactly what that level can hold.
//!
//! ## Quick Start
//!
//! ```
//! use compactly::{ByteFenwick, FenwickTree, WordRankSelect};
//!
//! // A packed tree over increments bounded by 64 (7-bit leaves).
//! let mut tree = ByteFenwick::<7>::from_increments(&[3, 1, 4, 1, 5]);
//! assert_eq!(tree.prefix_sum(4), 14);
//! tree.update(2, -4);
//! assert_eq!(tree.prefix_sum(4), 10);
//!
//! // A mutable rank/select dictionary over a packed bit array.
//! let mut bits = WordRankSelect::<ByteFenwick<7>>::new(vec![0b1011, 0, u64::MAX]);
//! assert_eq!(bits.rank(64), 3);
//! assert_eq!(bits.select(3), 128);
//! bits.update(1, 0b1);
//! assert_eq!(bits.select(3), 64);
//! ```
//!
//! ## Choosing a variant
//!
//! All eight tree variants answer every query identically; they differ
//! in footprint and cache behavior:
//!
//! - [`FixedFenwick`] / [`InterleavedFixedFenwick`] - one `u64` per
//!   node, no compression, fastest access
//! - [`ByteFenwick`] / [`InterleavedByteFenwick`] - whole bytes per
//!   node, good balance of space and speed
//! - [`BitFenwick`] / [`InterleavedBitFenwick`] - exact bits per node,
//!   tightest packing
//! - [`TypedFenwick`] / [`InterleavedTypedFenwick`] - levels bucketed
//!   into `u8`/`u16`/`u32`/`u64` arrays, native aligned access
//!
//! The `Interleaved` layouts store nodes in identifier order instead of
//! level-major order, which keeps query paths in nearby cache lines.
//!
//! ## Features
//!
//! - `std` (default) - build against the standard library
//! - `serde` - serialization/deserialization for all public structures
//! - `portable-popcount` - portable bitwise popcount (for benchmarking)

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

mod broadword;
pub mod fenwick;
mod line;
mod popcount;

pub use broadword::select_in_word;
pub use fenwick::{
    BitFenwick, ByteFenwick, FenwickTree, FixedFenwick, InterleavedBitFenwick,
    InterleavedByteFenwick, InterleavedFixedFenwick, InterleavedTypedFenwick, TypedFenwick,
    leaf_bits,
};
pub use line::{LineRankSelect, WordRankSelect};
pub use popcount::{popcount_word, popcount_words};
