//! Benchmark utilities for txkv.

use rand::seq::SliceRandom;
use rand::Rng;
use txkv_testkit::KeySet;

/// Returns `count` values drawn uniformly from the whole `i32` range.
pub fn random_values(count: usize) -> Vec<i32> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen()).collect()
}

/// Returns the indices `0..len` in random order.
pub fn shuffled_indices(len: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(&mut rand::thread_rng());
    indices
}

/// Returns `count` keys that are never written by fixtures built from
/// `KeySet::new(prefix, _)`.
pub fn absent_keys(prefix: &str, count: usize) -> KeySet {
    KeySet::new(&format!("{prefix}-absent-"), count)
}
