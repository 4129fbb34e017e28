//! Historical dataset provider.
//!
//! Supplies the ordered sequence of annual records the forecaster is trained
//! on, either from the bundled sample fixture or from an uploaded delimited
//! table whose header matches the dataset's column names.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::config;
use crate::connection::{quote_ident, Connection};
use crate::error::{ForecastError, Result};
use crate::models::{Field, FinancialRecord};

/// Ordered, duplicate-free annual records.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    records: Vec<FinancialRecord>,
}

impl HistoricalDataset {
    /// The bundled 2014–2023 sample.
    pub fn sample() -> Result<Self> {
        let records: Vec<FinancialRecord> = serde_json::from_str(config::SAMPLE_DATASET)?;
        Self::from_records(records)
    }

    /// Build a dataset from records constructed in code.
    ///
    /// Records are sorted by year; duplicate years are rejected.
    pub fn from_records(mut records: Vec<FinancialRecord>) -> Result<Self> {
        records.sort_by_key(|r| r.year);
        if let Some(pair) = records.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(ForecastError::DuplicateYear(pair[0].year));
        }
        Ok(Self { records })
    }

    /// Load an uploaded delimited table through DuckDB's CSV reader.
    ///
    /// Every expected column must be present (extra columns are ignored).
    /// The year column must hold integers. Other cells that do not parse
    /// as numbers are kept as NaN and rejected when the estimator is fitted.
    pub fn from_csv<P: AsRef<Path>>(conn: &Connection, path: P) -> Result<Self> {
        let path = path.as_ref();
        conn.register_table_from_csv(config::UPLOAD_TABLE, &path.to_string_lossy())?;

        let columns = conn.columns(config::UPLOAD_TABLE)?;
        let missing: Vec<String> = Field::ALL
            .iter()
            .map(|f| f.column())
            .filter(|c| !columns.iter().any(|have| have == c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ForecastError::SchemaMismatch { missing });
        }
        let extra = columns.iter().filter(|c| Field::from_column(c).is_none()).count();
        if extra > 0 {
            debug!(extra, "ignoring unrecognised columns in upload");
        }

        let select: Vec<String> = Field::ALL.iter().map(|f| quote_ident(f.column())).collect();
        let rows = conn.execute(
            &format!(
                "SELECT {} FROM {}",
                select.join(", "),
                quote_ident(config::UPLOAD_TABLE)
            ),
            &[],
        )?;

        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_row(i + 1, row))
            .collect::<Result<Vec<_>>>()?;

        let dataset = Self::from_records(records)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            "loaded historical dataset from upload"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.records.first().map(|r| r.year)
    }

    pub fn last(&self) -> Option<&FinancialRecord> {
        self.records.last()
    }

    /// Records whose year lies in `from..=to`.
    pub fn window(&self, from: i32, to: i32) -> Vec<FinancialRecord> {
        self.records
            .iter()
            .filter(|r| r.year >= from && r.year <= to)
            .cloned()
            .collect()
    }

    pub fn into_records(self) -> Vec<FinancialRecord> {
        self.records
    }
}

fn parse_row(row_number: usize, row: &HashMap<String, Value>) -> Result<FinancialRecord> {
    let text = |field: Field| -> String {
        match row.get(field.column()) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    };

    let raw_year = text(Field::Year);
    let year = parse_year(&raw_year).ok_or_else(|| ForecastError::InvalidYear {
        row: row_number,
        value: raw_year.clone(),
    })?;

    let mut record = FinancialRecord {
        year,
        net_revenues: f64::NAN,
        cost_of_sales: f64::NAN,
        sg_and_a_costs: f64::NAN,
        rd_costs: f64::NAN,
        depreciation_amortization: f64::NAN,
        cash_flow_operating: f64::NAN,
        cash_flow_investing: f64::NAN,
        cash_flow_financing: f64::NAN,
        wip_inventory: f64::NAN,
        finished_goods_inventory: f64::NAN,
        raw_materials_inventory: f64::NAN,
        car_units_sold: f64::NAN,
    };
    for field in Field::ALL.into_iter().skip(1) {
        if let Some(slot) = record.get_mut(field) {
            *slot = text(field).parse::<f64>().unwrap_or(f64::NAN);
        }
    }
    Ok(record)
}

/// Accepts plain integers and integral decimals such as `2014.0`.
fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(y) = raw.parse::<i32>() {
        return Some(y);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}
