use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Table holding the loaded historical records.
pub const HISTORY_TABLE: &str = "financials";
/// Table holding the raw text columns of an uploaded delimited file.
pub const UPLOAD_TABLE: &str = "financials_upload";
/// Table holding the combined timeline of the most recent forecast run.
pub const TIMELINE_TABLE: &str = "forecast_timeline";

pub const SAMPLE_DATASET: &str = include_str!("../data/sample_financials.json");

pub const DEFAULT_GROWTH_RATE: f64 = 0.05;
pub const DEFAULT_WIP_SHARE: f64 = 0.5;
pub const DEFAULT_RAW_MATERIALS_SHARE: f64 = 0.3;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_N_ESTIMATORS: usize = 100;
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.2;

pub const MAX_PRODUCTS: usize = 4;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// ---------------------------------------------------------------------------
// ForestConfig
// ---------------------------------------------------------------------------

/// Hyperparameters of the random forest estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them.
    pub max_features: Option<usize>,
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            seed: DEFAULT_SEED,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ForecastConfig
// ---------------------------------------------------------------------------

/// Projection assumptions and estimator settings.
///
/// Every key is optional when deserialising; missing keys take the defaults
/// (5% growth, 50% of the inventory delta to work-in-progress, 30% to raw
/// materials, 20% validation hold-out, 100 trees seeded with 42).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Multiplicative growth applied each forecast year to costs, cash flows
    /// and unit sales.
    pub growth_rate: f64,
    /// Share of the inventory delta added to work-in-progress inventory.
    pub wip_share: f64,
    /// Share of the inventory delta added to raw-materials inventory.
    pub raw_materials_share: f64,
    /// Hold-out fraction used by the single-year forecast.
    pub validation_fraction: f64,
    pub forest: ForestConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,
            wip_share: DEFAULT_WIP_SHARE,
            raw_materials_share: DEFAULT_RAW_MATERIALS_SHARE,
            validation_fraction: DEFAULT_VALIDATION_FRACTION,
            forest: ForestConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject assumptions that would produce meaningless projections.
    ///
    /// The growth rate must be finite and above -100%, the inventory shares
    /// finite and non-negative, the validation fraction inside (0, 1), and
    /// the forest must have at least one tree.
    pub fn validate(&self) -> Result<()> {
        if !(self.growth_rate.is_finite() && self.growth_rate > -1.0) {
            return Err(invalid("growth_rate", self.growth_rate));
        }
        for (name, share) in [
            ("wip_share", self.wip_share),
            ("raw_materials_share", self.raw_materials_share),
        ] {
            if !(share.is_finite() && share >= 0.0) {
                return Err(invalid(name, share));
            }
        }
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(invalid("validation_fraction", self.validation_fraction));
        }
        if self.forest.n_estimators == 0 {
            return Err(ForecastError::InvalidArgument(
                "forest.n_estimators must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: f64) -> ForecastError {
    ForecastError::InvalidArgument(format!("{} is out of range: {}", key, value))
}
