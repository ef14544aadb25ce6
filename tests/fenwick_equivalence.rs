//! Same-behavior tests for the Fenwick tree family.
//!
//! Every variant is exercised against a plain prefix-sum model over the
//! same randomized increments and update stream; since each variant must
//! match the model exactly, all eight variants are mutually identical.

use compactly::{
    BitFenwick, ByteFenwick, FenwickTree, FixedFenwick, InterleavedBitFenwick,
    InterleavedByteFenwick, InterleavedFixedFenwick, InterleavedTypedFenwick, TypedFenwick,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Increments bounded by 64, the rank/select layer's leaf bound.
const BOUND: u64 = 64;

fn random_increments(rng: &mut ChaCha8Rng, size: usize) -> Vec<u64> {
    (0..size).map(|_| rng.gen_range(0..=BOUND)).collect()
}

/// A signed update stream that keeps every increment in `0..=BOUND`.
fn random_updates(rng: &mut ChaCha8Rng, increments: &[u64]) -> Vec<(usize, i64)> {
    let mut model = increments.to_vec();
    let mut updates = Vec::with_capacity(model.len());
    for _ in 0..model.len() {
        let idx = rng.gen_range(0..model.len());
        let delta = rng.gen_range(-(model[idx] as i64)..=(BOUND - model[idx]) as i64);
        model[idx] = (model[idx] as i64 + delta) as u64;
        updates.push((idx, delta));
    }
    updates
}

fn prefix_sums(model: &[u64]) -> Vec<u64> {
    model
        .iter()
        .scan(0u64, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Smallest index whose prefix sum exceeds `target`, clamped to the last.
fn model_find(sums: &[u64], target: u64) -> usize {
    sums.partition_point(|&s| s <= target).min(sums.len() - 1)
}

fn assert_matches_model<T: FenwickTree>(tree: &T, model: &[u64], context: &str) {
    let size = model.len();
    let sums = prefix_sums(model);
    let bound = 1u64 << (T::BITS - 1);
    let complement_sums: Vec<u64> = sums
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as u64 + 1) * bound - s)
        .collect();

    for i in 0..size {
        assert_eq!(tree.prefix_sum(i), sums[i], "{context}: prefix_sum({i})");
    }

    // Probe every boundary of the prefix-sum staircase, plus the far end.
    for i in 0..size {
        for target in [sums[i].saturating_sub(1), sums[i]] {
            assert_eq!(
                tree.find(target),
                model_find(&sums, target),
                "{context}: find({target})"
            );
        }
        for target in [complement_sums[i].saturating_sub(1), complement_sums[i]] {
            assert_eq!(
                tree.find_complement(target),
                model_find(&complement_sums, target),
                "{context}: find_complement({target})"
            );
        }
    }
    let total = sums[size - 1];
    assert_eq!(tree.find(total), size - 1, "{context}: find(total)");
    assert_eq!(tree.find(total + 100), size - 1, "{context}: find past total");
    let complement_total = complement_sums[size - 1];
    assert_eq!(tree.find_complement(complement_total), size - 1, "{context}");
    assert_eq!(tree.find_complement(complement_total + 100), size - 1, "{context}");
}

fn exercise<T: FenwickTree>(increments: &[u64], updates: &[(usize, i64)]) {
    let mut model = increments.to_vec();
    let mut tree = T::from_increments(increments);
    assert_eq!(tree.len(), increments.len());

    let context = format!("{} bits, {} elements, fresh", T::BITS, model.len());
    assert_matches_model(&tree, &model, &context);

    for &(idx, delta) in updates {
        tree.update(idx, delta);
        model[idx] = (model[idx] as i64 + delta) as u64;
    }
    let context = format!("{} bits, {} elements, updated", T::BITS, model.len());
    assert_matches_model(&tree, &model, &context);
}

fn exercise_all_variants<const BITS: usize>(rng: &mut ChaCha8Rng, size: usize) {
    let increments = random_increments(rng, size);
    let updates = random_updates(rng, &increments);

    exercise::<FixedFenwick<BITS>>(&increments, &updates);
    exercise::<InterleavedFixedFenwick<BITS>>(&increments, &updates);
    exercise::<ByteFenwick<BITS>>(&increments, &updates);
    exercise::<InterleavedByteFenwick<BITS>>(&increments, &updates);
    exercise::<BitFenwick<BITS>>(&increments, &updates);
    exercise::<InterleavedBitFenwick<BITS>>(&increments, &updates);
    exercise::<TypedFenwick<BITS>>(&increments, &updates);
    exercise::<InterleavedTypedFenwick<BITS>>(&increments, &updates);
}

#[test]
fn perfect_trees() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for size in [1usize, 3, 7, 15, 31, 63, 127, 255, 511, 1023] {
        exercise_all_variants::<7>(&mut rng, size);
    }
}

#[test]
fn partial_trees() {
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    for size in 1..=130usize {
        exercise_all_variants::<7>(&mut rng, size);
    }
    for size in [257usize, 511, 513, 640, 1000, 1025] {
        exercise_all_variants::<7>(&mut rng, size);
    }
}

#[test]
fn wider_leaves() {
    // The same increments under wider leaf widths (value bounds 1024,
    // 4096 and 65536): storage widens, answers must not change.
    let mut rng = ChaCha8Rng::seed_from_u64(44);
    for size in [100usize, 511, 1023, 1024] {
        exercise_all_variants::<11>(&mut rng, size);
        exercise_all_variants::<13>(&mut rng, size);
        exercise_all_variants::<17>(&mut rng, size);
    }
}

#[test]
fn saturated_increments() {
    // Every leaf at the bound drives every node to its level maximum.
    let increments = vec![BOUND; 257];
    let updates: Vec<(usize, i64)> = Vec::new();
    exercise::<FixedFenwick<7>>(&increments, &updates);
    exercise::<InterleavedFixedFenwick<7>>(&increments, &updates);
    exercise::<ByteFenwick<7>>(&increments, &updates);
    exercise::<InterleavedByteFenwick<7>>(&increments, &updates);
    exercise::<BitFenwick<7>>(&increments, &updates);
    exercise::<InterleavedBitFenwick<7>>(&increments, &updates);
    exercise::<TypedFenwick<7>>(&increments, &updates);
    exercise::<InterleavedTypedFenwick<7>>(&increments, &updates);
}

#[test]
fn large_tree_totals() {
    // 2^20 - 1 random increments: totals and spot queries only.
    let mut rng = ChaCha8Rng::seed_from_u64(45);
    let size = (1 << 20) - 1;
    let increments = random_increments(&mut rng, size);
    let total: u64 = increments.iter().sum();
    let sums = prefix_sums(&increments);

    fn spot_check<T: FenwickTree>(increments: &[u64], sums: &[u64], total: u64, probes: &[usize]) {
        let tree = T::from_increments(increments);
        assert_eq!(tree.prefix_sum(increments.len() - 1), total);
        for &i in probes {
            assert_eq!(tree.prefix_sum(i), sums[i], "prefix_sum({i})");
            let target = sums[i];
            assert_eq!(tree.find(target), model_find(sums, target), "find({target})");
        }
        assert_eq!(tree.find(total + 1), increments.len() - 1);
    }

    let probes: Vec<usize> = (0..1000).map(|_| rng.gen_range(0..size)).collect();
    spot_check::<FixedFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<InterleavedFixedFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<ByteFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<InterleavedByteFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<BitFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<InterleavedBitFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<TypedFenwick<7>>(&increments, &sums, total, &probes);
    spot_check::<InterleavedTypedFenwick<7>>(&increments, &sums, total, &probes);
}
