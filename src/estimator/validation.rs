//! Hold-out validation helpers.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ForecastError, Result};

/// Row indices of a shuffled train/validation partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(test_fraction * n)` rows.
///
/// Both sides are guaranteed at least one row, so `n` must be 2 or more and
/// `test_fraction` must lie strictly between 0 and 1.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if n < 2 {
        return Err(ForecastError::InvalidArgument(format!(
            "need at least 2 rows to hold out a validation split, got {}",
            n
        )));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ForecastError::InvalidArgument(format!(
            "validation fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = ((test_fraction * n as f64).ceil() as usize).clamp(1, n - 1);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let test = order[..n_test].to_vec();
    let train = order[n_test..].to_vec();
    Ok(TrainTestSplit { train, test })
}

/// Mean absolute error between two equally long slices.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(ForecastError::InvalidArgument(format!(
            "cannot score {} predictions against {} actual values",
            predicted.len(),
            actual.len()
        )));
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(total / actual.len() as f64)
}
