//! Iterative multi-year revenue forecaster.
//!
//! The estimator maps the eleven non-year fields to net revenues and has no
//! notion of time, so projecting forward means manufacturing a complete
//! next-year feature row first: growing fields are scaled by the growth rate,
//! inventories are bumped by the inventory delta, and the fitted model then
//! predicts that year's revenues. Each projected record is the baseline for
//! the next step.

use tracing::{debug, info, warn};

use crate::config::ForecastConfig;
use crate::dataset::HistoricalDataset;
use crate::error::{ForecastError, Result};
use crate::estimator::{mean_absolute_error, train_test_split, RandomForestRegressor, Regressor};
use crate::models::{
    Field, FinancialRecord, ForecastRun, RecordOrigin, SingleYearForecast, SingleYearOutcome,
    TimelineRecord,
};

/// Synthesise the following year's record from `prev`.
///
/// Net revenues are carried over unchanged; callers replace them with a
/// prediction. Fails when the delta is not finite or the year cannot advance.
pub fn synthesize_next(
    prev: &FinancialRecord,
    config: &ForecastConfig,
    inventory_delta: f64,
) -> Result<FinancialRecord> {
    check_delta(inventory_delta)?;
    let year = next_year(prev.year)?;
    let mut next = prev.clone();
    let multiplier = 1.0 + config.growth_rate;
    for field in Field::GROWING {
        if let Some(slot) = next.get_mut(field) {
            *slot *= multiplier;
        }
    }
    next.finished_goods_inventory += inventory_delta;
    next.wip_inventory += config.wip_share * inventory_delta;
    next.raw_materials_inventory += config.raw_materials_share * inventory_delta;
    next.year = year;
    Ok(next)
}

fn check_delta(inventory_delta: f64) -> Result<()> {
    if inventory_delta.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::InvalidArgument(format!(
            "inventory delta must be finite, got {}",
            inventory_delta
        )))
    }
}

fn next_year(year: i32) -> Result<i32> {
    year.checked_add(1).ok_or_else(|| {
        ForecastError::InvalidArgument(format!("no year follows {}", year))
    })
}

/// Build the feature matrix and target vector, rejecting non-finite cells.
pub fn training_matrix(records: &[FinancialRecord]) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    if records.is_empty() {
        return Err(ForecastError::EmptyDataset);
    }
    let mut x = Vec::with_capacity(records.len());
    let mut y = Vec::with_capacity(records.len());
    for record in records {
        for field in Field::FEATURES.iter().chain(std::iter::once(&Field::TARGET)) {
            if !record.get(*field).is_finite() {
                return Err(ForecastError::InvalidValue {
                    field: field.column().to_string(),
                    year: record.year,
                });
            }
        }
        x.push(record.features());
        y.push(record.net_revenues);
    }
    Ok((x, y))
}

// ---------------------------------------------------------------------------
// Forecaster
// ---------------------------------------------------------------------------

/// Fits a [`Regressor`] on historical records and projects revenues forward.
pub struct Forecaster<R: Regressor = RandomForestRegressor> {
    config: ForecastConfig,
    model: R,
    fitted: bool,
}

impl Forecaster<RandomForestRegressor> {
    /// A forecaster backed by a random forest built from `config.forest`.
    pub fn new(config: ForecastConfig) -> Self {
        let model = RandomForestRegressor::new(config.forest.clone());
        Self::with_model(config, model)
    }
}

impl<R: Regressor> Forecaster<R> {
    /// A forecaster backed by a caller-supplied estimator.
    pub fn with_model(config: ForecastConfig, model: R) -> Self {
        Self {
            config,
            model,
            fitted: false,
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Fit the estimator on every record (no hold-out).
    pub fn fit(&mut self, records: &[FinancialRecord]) -> Result<()> {
        let (x, y) = training_matrix(records)?;
        self.fitted = false;
        self.model.fit(&x, &y)?;
        self.fitted = true;
        info!(rows = records.len(), "fitted revenue estimator");
        Ok(())
    }

    /// Predict net revenues from a record's feature fields.
    pub fn predict(&self, record: &FinancialRecord) -> Result<f64> {
        if !self.fitted {
            return Err(ForecastError::NotFitted);
        }
        self.model.predict_one(&record.features())
    }

    /// Project `horizon` years beyond the last historical record.
    ///
    /// Returns the historical records followed by the projections. The
    /// estimator must already be fitted.
    pub fn project(
        &self,
        history: &HistoricalDataset,
        horizon: usize,
        inventory_delta: f64,
    ) -> Result<ForecastRun> {
        if horizon < 1 {
            return Err(ForecastError::InvalidArgument(
                "forecast horizon must be at least 1 year".to_string(),
            ));
        }
        check_delta(inventory_delta)?;
        let last = history.last().ok_or(ForecastError::EmptyDataset)?;

        let mut timeline: Vec<TimelineRecord> = history
            .records()
            .iter()
            .map(|r| TimelineRecord {
                record: r.clone(),
                origin: RecordOrigin::Historical,
            })
            .collect();
        timeline.reserve(horizon);

        let mut baseline = last.clone();
        for _ in 0..horizon {
            let mut next = synthesize_next(&baseline, &self.config, inventory_delta)?;
            next.net_revenues = self.predict(&next)?;
            debug!(
                year = next.year,
                net_revenues = next.net_revenues,
                "projected year"
            );
            timeline.push(TimelineRecord {
                record: next.clone(),
                origin: RecordOrigin::Forecast,
            });
            baseline = next;
        }

        Ok(ForecastRun {
            horizon,
            inventory_delta,
            timeline,
        })
    }

    /// Fit on the whole history, then [`project`](Self::project).
    pub fn fit_and_project(
        &mut self,
        history: &HistoricalDataset,
        horizon: usize,
        inventory_delta: f64,
    ) -> Result<ForecastRun> {
        self.fit(history.records())?;
        self.project(history, horizon, inventory_delta)
    }
}

impl<R: Regressor + Clone> Forecaster<R> {
    /// Predict the single year following the history, with hold-out validation.
    ///
    /// A seeded `validation_fraction` of the rows is held out, a copy of the
    /// estimator is fitted on the remainder and scored on the held-out rows,
    /// and the next year's synthesised record is predicted. Any year other
    /// than `last_year + 1` is reported as [`SingleYearOutcome::OutOfRange`].
    /// The estimator held by `self` is left untouched.
    pub fn forecast_single_year(
        &self,
        history: &HistoricalDataset,
        target_year: i32,
        inventory_delta: f64,
    ) -> Result<SingleYearOutcome> {
        check_delta(inventory_delta)?;
        let last = history.last().ok_or(ForecastError::EmptyDataset)?;
        let supported = next_year(last.year)?;
        if target_year != supported {
            warn!(
                requested = target_year,
                supported, "forecast requested for an unsupported year"
            );
            return Ok(SingleYearOutcome::OutOfRange {
                requested: target_year,
                supported,
            });
        }

        let (x, y) = training_matrix(history.records())?;
        let split = train_test_split(
            x.len(),
            self.config.validation_fraction,
            self.config.forest.seed,
        )?;
        let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<f64>) {
            (
                idx.iter().map(|&i| x[i].clone()).collect(),
                idx.iter().map(|&i| y[i]).collect(),
            )
        };
        let (x_train, y_train) = pick(&split.train);
        let (x_test, y_test) = pick(&split.test);

        let mut model = self.model.clone();
        model.fit(&x_train, &y_train)?;
        let validation_mae = mean_absolute_error(&y_test, &model.predict(&x_test)?)?;

        let mut record = synthesize_next(last, &self.config, inventory_delta)?;
        record.net_revenues = model.predict_one(&record.features())?;
        info!(
            year = record.year,
            net_revenues = record.net_revenues,
            validation_mae,
            "single-year forecast"
        );

        Ok(SingleYearOutcome::Predicted(SingleYearForecast {
            year: record.year,
            predicted_net_revenues: record.net_revenues,
            validation_mae,
            train_size: split.train.len(),
            validation_size: split.test.len(),
            record,
        }))
    }
}
