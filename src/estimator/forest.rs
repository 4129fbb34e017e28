//! Random forest regressor: bootstrap-aggregated CART trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tree::{RegressionTree, TreeParams};
use super::{check_training_set, Regressor};
use crate::config::ForestConfig;
use crate::error::{ForecastError, Result};

/// Bagged ensemble of regression trees.
///
/// Every tree is grown on a bootstrap resample (drawn with replacement, same
/// size as the training set) of the data. The prediction is the mean of the
/// tree predictions, so it always lies within the range of observed targets.
/// Fitting is fully determined by the configured seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    n_features: Option<usize>,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl RandomForestRegressor {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: self.config.max_features,
        }
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let width = check_training_set(x, y)?;
        if self.config.n_estimators == 0 {
            return Err(ForecastError::InvalidArgument(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let params = self.tree_params();
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for _ in 0..self.config.n_estimators {
            let indices: Vec<usize> = if self.config.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            let mut tree = RegressionTree::new(params, rng.gen());
            tree.fit_indices(x, y, &indices)?;
            trees.push(tree);
        }

        debug!(
            trees = trees.len(),
            samples = n,
            features = width,
            "fitted random forest"
        );
        self.trees = trees;
        self.n_features = Some(width);
        Ok(())
    }

    fn predict_one(&self, row: &[f64]) -> Result<f64> {
        let expected = self.n_features.ok_or(ForecastError::NotFitted)?;
        if row.len() != expected {
            return Err(ForecastError::FeatureMismatch {
                expected,
                actual: row.len(),
            });
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_one(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}
