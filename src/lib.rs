//! Revenue forecasting for a small annual financial dataset.
//!
//! Loads ten years of income-statement and cash-flow figures (the bundled
//! sample or an uploaded delimited table), fits a random forest mapping the
//! cost, cash-flow, inventory and unit-sales fields to net revenues, and
//! projects revenues year by year from synthesised feature rows. Loaded and
//! projected records are kept as tables in an in-process DuckDB database.
//!
//! # Quick start
//!
//! ```no_run
//! use revenue_forecast::{Dashboard, ForecastRequest};
//!
//! let dashboard = Dashboard::builder().build().unwrap();
//!
//! // Five years ahead, no extra inventory
//! let run = dashboard.forecast(&ForecastRequest::new(5, 0.0)).unwrap();
//! let kpis = dashboard.kpis(&run);
//! ```

pub mod config;
pub mod connection;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod forecaster;
pub mod gallery;
pub mod inventory;
pub mod kpi;
pub mod models;
pub mod sql_builder;

pub use config::{ForecastConfig, ForestConfig};
pub use connection::Connection;
pub use dataset::HistoricalDataset;
pub use error::{ForecastError, Result};
pub use estimator::{RandomForestRegressor, Regressor};
pub use forecaster::Forecaster;
pub use inventory::{ForecastRequest, InventoryInput, ProductEntry};
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use models::{Field, FinancialRecord, ForecastRun, KpiRow, SingleYearOutcome};
use tracing::info;

// ---------------------------------------------------------------------------
// DashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Dashboard`].
///
/// Use [`Dashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DashboardBuilder::build).
#[derive(Default)]
pub struct DashboardBuilder {
    dataset_csv: Option<PathBuf>,
    config: ForecastConfig,
    image_dir: Option<PathBuf>,
}

impl DashboardBuilder {
    /// Load history from a delimited file instead of the bundled sample.
    pub fn dataset_csv<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dataset_csv = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the default forecasting assumptions and estimator settings.
    pub fn config(mut self, config: ForecastConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory of pre-rendered chart images served by
    /// [`Dashboard::gallery`].
    pub fn image_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.image_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate the configuration, open the DuckDB connection, load the
    /// dataset and register it as the `financials` table.
    pub fn build(self) -> Result<Dashboard> {
        self.config.validate()?;
        let conn = Connection::open_in_memory()?;
        let history = match &self.dataset_csv {
            Some(path) => HistoricalDataset::from_csv(&conn, path)?,
            None => HistoricalDataset::sample()?,
        };
        conn.register_records(config::HISTORY_TABLE, history.records())?;
        let source = if self.dataset_csv.is_some() { "upload" } else { "sample" };
        info!(rows = history.len(), source, "dashboard ready");
        Ok(Dashboard {
            conn,
            history,
            config: self.config,
            image_dir: self.image_dir,
        })
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Entry point tying the dataset, forecaster, KPIs and chart gallery together.
///
/// Every operation is a fresh, synchronous computation over the loaded
/// history; nothing carries over between calls except the tables registered
/// in the connection.
pub struct Dashboard {
    conn: Connection,
    history: HistoricalDataset,
    config: ForecastConfig,
    image_dir: Option<PathBuf>,
}

impl Dashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::default()
    }

    pub fn history(&self) -> &HistoricalDataset {
        &self.history
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Historical records with `from <= year <= to`.
    ///
    /// Years are selected from the `financials` table; the records come from
    /// the loaded history, so malformed cells stay NaN instead of surfacing
    /// as SQL NULLs.
    pub fn history_between(&self, from: i32, to: i32) -> Result<Vec<FinancialRecord>> {
        let year = Field::Year.column();
        let (sql, params) = SqlBuilder::new(config::HISTORY_TABLE)
            .select(&[year])
            .where_gte(year, &from.to_string())
            .where_lte(year, &to.to_string())
            .order_by(year, true)
            .build();
        let rows = self.conn.execute(&sql, &params)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let wanted = row
                .get(year)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| ForecastError::NotFound(format!("{} missing from row", year)))?;
            if let Some(record) = self
                .history
                .records()
                .iter()
                .find(|r| i64::from(r.year) == wanted)
            {
                records.push(record.clone());
            }
        }
        Ok(records)
    }

    /// An unfitted forecaster using this dashboard's configuration.
    pub fn forecaster(&self) -> Forecaster {
        Forecaster::new(self.config.clone())
    }

    /// Fit on the full history and project `request.horizon` years.
    ///
    /// The combined timeline is also registered as the `forecast_timeline`
    /// table, replacing the previous run.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastRun> {
        let mut forecaster = self.forecaster();
        let run = forecaster.fit_and_project(
            &self.history,
            request.horizon,
            request.inventory_delta,
        )?;
        self.conn
            .register_timeline(config::TIMELINE_TABLE, &run.timeline)?;
        Ok(run)
    }

    /// Hold-out validated prediction for the year after the history.
    pub fn forecast_single_year(
        &self,
        target_year: i32,
        inventory_delta: f64,
    ) -> Result<SingleYearOutcome> {
        self.forecaster()
            .forecast_single_year(&self.history, target_year, inventory_delta)
    }

    /// KPIs over a forecast run's combined timeline.
    pub fn kpis(&self, run: &ForecastRun) -> Vec<KpiRow> {
        kpi::timeline_kpis(run)
    }

    /// KPIs over the historical records only.
    pub fn history_kpis(&self) -> Vec<KpiRow> {
        kpi::compute_kpis(self.history.records())
    }

    /// Chart images from the configured directory, paired with `captions`.
    pub fn gallery<S: AsRef<str>>(&self, captions: &[S]) -> Result<Vec<gallery::GalleryImage>> {
        let dir = self
            .image_dir
            .as_ref()
            .ok_or_else(|| ForecastError::NotFound("no image directory configured".to_string()))?;
        gallery::captioned_images(dir, captions)
    }

    /// Execute a raw SQL query against the dashboard's DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Names of the tables registered so far.
    pub fn tables(&self) -> Vec<String> {
        self.conn.tables()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = match (self.history.first_year(), self.history.last()) {
            (Some(first), Some(last)) => format!("{}-{}", first, last.year),
            _ => "empty".to_string(),
        };
        write!(
            f,
            "Dashboard(years={}, tables=[{}], growth_rate={})",
            years,
            self.conn.tables().join(", "),
            self.config.growth_rate
        )
    }
}
