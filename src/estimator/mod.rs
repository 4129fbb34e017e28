//! Regression estimators used by the forecaster.
//!
//! The forecaster only needs `fit` and `predict`, so any model behind the
//! [`Regressor`] trait can be swapped in. The default is a bagged ensemble of
//! CART regression trees ([`RandomForestRegressor`]).

pub mod forest;
pub mod tree;
pub mod validation;

pub use forest::RandomForestRegressor;
pub use tree::RegressionTree;
pub use validation::{mean_absolute_error, train_test_split, TrainTestSplit};

use crate::error::{ForecastError, Result};

/// A supervised regression model over fixed-width `f64` feature rows.
pub trait Regressor {
    /// Fit the model on `x` (one row per sample) and targets `y`.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict the target for one feature row.
    fn predict_one(&self, row: &[f64]) -> Result<f64>;

    /// Predict the target for every row in `x`.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }

    /// Width of the rows the model was fitted on, or `None` before fitting.
    fn n_features(&self) -> Option<usize>;
}

/// Shared shape checks for `fit` implementations.
pub(crate) fn check_training_set(x: &[Vec<f64>], y: &[f64]) -> Result<usize> {
    if x.is_empty() {
        return Err(ForecastError::EmptyDataset);
    }
    if x.len() != y.len() {
        return Err(ForecastError::InvalidArgument(format!(
            "{} feature rows but {} targets",
            x.len(),
            y.len()
        )));
    }
    let width = x[0].len();
    if let Some(row) = x.iter().find(|r| r.len() != width) {
        return Err(ForecastError::FeatureMismatch {
            expected: width,
            actual: row.len(),
        });
    }
    Ok(width)
}
