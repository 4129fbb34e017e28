use serde::{Deserialize, Serialize};

use super::record::FinancialRecord;

// ---------------------------------------------------------------------------
// RecordOrigin — Whether a timeline entry was observed or projected
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Historical,
    Forecast,
}

impl RecordOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordOrigin::Historical => "historical",
            RecordOrigin::Forecast => "forecast",
        }
    }
}

// ---------------------------------------------------------------------------
// TimelineRecord — A record tagged with its origin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    #[serde(flatten)]
    pub record: FinancialRecord,
    pub origin: RecordOrigin,
}

// ---------------------------------------------------------------------------
// ForecastRun — Combined historical + projected sequence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRun {
    pub horizon: usize,
    pub inventory_delta: f64,
    pub timeline: Vec<TimelineRecord>,
}

impl ForecastRun {
    /// Only the projected records, in year order.
    pub fn forecasts(&self) -> impl Iterator<Item = &FinancialRecord> {
        self.timeline
            .iter()
            .filter(|r| r.origin == RecordOrigin::Forecast)
            .map(|r| &r.record)
    }

    /// Only the observed records, in year order.
    pub fn historical(&self) -> impl Iterator<Item = &FinancialRecord> {
        self.timeline
            .iter()
            .filter(|r| r.origin == RecordOrigin::Historical)
            .map(|r| &r.record)
    }

    /// Plain records of the whole timeline.
    pub fn records(&self) -> Vec<FinancialRecord> {
        self.timeline.iter().map(|r| r.record.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// SingleYearForecast — Hold-out validated prediction for one year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleYearForecast {
    pub year: i32,
    pub predicted_net_revenues: f64,
    /// Mean absolute error on the held-out validation rows.
    pub validation_mae: f64,
    pub train_size: usize,
    pub validation_size: usize,
    /// The synthesised inputs the prediction was made from.
    pub record: FinancialRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SingleYearOutcome {
    Predicted(SingleYearForecast),
    /// The requested year is not the one supported year; nothing is shown.
    OutOfRange { requested: i32, supported: i32 },
}
