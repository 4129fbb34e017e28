//! CART regression tree.
//!
//! Splits greedily on the threshold that minimises the summed squared error
//! of the two children. Thresholds are midpoints between consecutive distinct
//! values of the sorted feature; leaves predict the mean target.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{check_training_set, Regressor};
use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn (without replacement) at each split; `None` uses all.
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    params: TreeParams,
    seed: u64,
    root: Option<Node>,
    n_features: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    cost: f64,
}

impl RegressionTree {
    pub fn new(params: TreeParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            root: None,
            n_features: 0,
        }
    }

    /// Fit on the rows of `x` selected by `indices` (repeats allowed, as
    /// produced by bootstrap sampling).
    pub fn fit_indices(&mut self, x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Result<()> {
        let width = check_training_set(x, y)?;
        if indices.is_empty() {
            return Err(ForecastError::EmptyDataset);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut idx = indices.to_vec();
        self.n_features = width;
        self.root = Some(self.grow(x, y, &mut idx, 0, &mut rng));
        Ok(())
    }

    /// Depth of the fitted tree (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        self.root.as_ref().map(walk).unwrap_or(0)
    }

    fn grow(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        idx: &mut [usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        let value = mean(idx.iter().map(|&i| y[i]));
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || idx.len() < self.params.min_samples_split.max(2) {
            return Node::Leaf { value };
        }
        // Pure node: nothing left to reduce
        if idx.iter().all(|&i| y[i] == y[idx[0]]) {
            return Node::Leaf { value };
        }

        let mut features: Vec<usize> = (0..self.n_features).collect();
        if let Some(k) = self.params.max_features {
            features.shuffle(rng);
            features.truncate(k.max(1));
        }

        let Some(best) = self.best_split(x, y, idx, &features) else {
            return Node::Leaf { value };
        };

        // Partition in place: left side holds values <= threshold
        let mut boundary = 0;
        for pos in 0..idx.len() {
            if x[idx[pos]][best.feature] <= best.threshold {
                idx.swap(pos, boundary);
                boundary += 1;
            }
        }
        let (left_idx, right_idx) = idx.split_at_mut(boundary);
        let left = self.grow(x, y, left_idx, depth + 1, rng);
        let right = self.grow(x, y, right_idx, depth + 1, rng);

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        idx: &[usize],
        features: &[usize],
    ) -> Option<BestSplit> {
        let n = idx.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total_sum: f64 = idx.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = idx.iter().map(|&i| y[i] * y[i]).sum();
        let parent_cost = total_sq - total_sum * total_sum / n as f64;

        let mut best: Option<BestSplit> = None;
        let mut order: Vec<usize> = idx.to_vec();

        for &feature in features {
            order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let yi = y[order[pos]];
                left_sum += yi;
                left_sq += yi * yi;

                let left_n = pos + 1;
                let right_n = n - left_n;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }
                let here = x[order[pos]][feature];
                let next = x[order[pos + 1]][feature];
                if here == next {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let cost = (left_sq - left_sum * left_sum / left_n as f64)
                    + (right_sq - right_sum * right_sum / right_n as f64);

                if best.as_ref().map_or(true, |b| cost < b.cost) {
                    let mut threshold = here + (next - here) / 2.0;
                    // Midpoint can round up to `next` for adjacent floats
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        cost,
                    });
                }
            }
        }

        best.filter(|b| b.cost < parent_cost)
    }
}

impl Regressor for RegressionTree {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let indices: Vec<usize> = (0..x.len()).collect();
        self.fit_indices(x, y, &indices)
    }

    fn predict_one(&self, row: &[f64]) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or(ForecastError::NotFitted)?;
        if row.len() != self.n_features {
            return Err(ForecastError::FeatureMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    fn n_features(&self) -> Option<usize> {
        self.root.as_ref().map(|_| self.n_features)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
