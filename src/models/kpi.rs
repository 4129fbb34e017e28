use serde::{Deserialize, Serialize};

use super::forecast::RecordOrigin;

// ---------------------------------------------------------------------------
// KpiRow — Derived ratios for one year (all in percent)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRow {
    pub year: i32,
    pub origin: RecordOrigin,
    /// `None` for the first record of a sequence.
    pub revenue_growth_pct: Option<f64>,
    pub gross_margin_pct: Option<f64>,
    pub operating_margin_pct: Option<f64>,
    pub rd_rate_pct: Option<f64>,
}
