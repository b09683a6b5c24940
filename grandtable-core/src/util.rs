//! Selection and RNG utilities shared by suites and strategies
//!
//! Level 4 - Utilities

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::matrix::Action;

/// Create RNG from seed or entropy
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// All indices holding the maximum value (exact comparison, NaN never wins)
pub fn max_indices(values: &[f64]) -> Vec<usize> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == max)
        .map(|(i, _)| i)
        .collect()
}

/// Uniform pick among `0..n`
///
/// # Panics
/// Panics if `n` is zero (strategy used before initialize)
pub fn uniform_action<R: Rng>(rng: &mut R, n: usize) -> Action {
    assert!(n > 0, "No actions available - was the strategy initialized?");
    rng.gen_range(0..n)
}

/// Uniform pick among the indices tied for the maximum value
pub fn argmax_uniform<R: Rng>(rng: &mut R, values: &[f64]) -> Action {
    let best = max_indices(values);
    if best.is_empty() {
        // Every value was NaN
        return uniform_action(rng, values.len());
    }
    best[rng.gen_range(0..best.len())]
}

/// Arithmetic mean, `None` for an empty sequence
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
