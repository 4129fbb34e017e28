//! Shared test fixtures for the revenue forecast integration tests.
//!
//! Provides the bundled sample as records and as delimited text, so upload
//! tests can start from known-good data and break exactly one thing.

#![allow(dead_code)]

use revenue_forecast::models::{Field, FinancialRecord};
use revenue_forecast::{ForecastConfig, ForestConfig, HistoricalDataset};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn sample() -> HistoricalDataset {
    HistoricalDataset::sample().unwrap()
}

pub fn sample_records() -> Vec<FinancialRecord> {
    sample().into_records()
}

/// Default assumptions with a smaller forest, for tests that fit many times.
pub fn quick_config() -> ForecastConfig {
    ForecastConfig {
        forest: ForestConfig {
            n_estimators: 10,
            ..ForestConfig::default()
        },
        ..ForecastConfig::default()
    }
}

/// Render records as comma-separated text with the given columns.
pub fn to_csv(records: &[FinancialRecord], columns: &[Field]) -> String {
    let mut out = String::new();
    let header: Vec<&str> = columns.iter().map(|f| f.column()).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for r in records {
        let cells: Vec<String> = columns
            .iter()
            .map(|f| match f {
                Field::Year => r.year.to_string(),
                other => r.get(*other).to_string(),
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// The full sample as comma-separated text.
pub fn sample_csv() -> String {
    to_csv(&sample_records(), &Field::ALL)
}

/// Write text to a temp file with a `.csv` suffix. Keep the handle alive
/// until the file has been read.
pub fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
