//! Derived per-year ratios over a record sequence.

use crate::models::{FinancialRecord, ForecastRun, KpiRow, RecordOrigin};

/// Compute KPIs for a sequence of historical records.
pub fn compute_kpis(records: &[FinancialRecord]) -> Vec<KpiRow> {
    compute_tagged(records.iter().map(|r| (r, RecordOrigin::Historical)))
}

/// Compute KPIs over a forecast run's combined timeline.
pub fn timeline_kpis(run: &ForecastRun) -> Vec<KpiRow> {
    compute_tagged(run.timeline.iter().map(|t| (&t.record, t.origin)))
}

fn compute_tagged<'a>(
    records: impl Iterator<Item = (&'a FinancialRecord, RecordOrigin)>,
) -> Vec<KpiRow> {
    let mut prior: Option<f64> = None;
    records
        .map(|(record, origin)| {
            let revenue = record.net_revenues;
            let row = KpiRow {
                year: record.year,
                origin,
                revenue_growth_pct: prior.and_then(|p| growth_pct(p, revenue)),
                gross_margin_pct: ratio_pct(revenue - record.cost_of_sales, revenue),
                operating_margin_pct: ratio_pct(operating_profit(record), revenue),
                rd_rate_pct: ratio_pct(record.rd_costs, revenue),
            };
            prior = Some(revenue);
            row
        })
        .collect()
}

/// Revenue minus cost of sales, SG&A, R&D and depreciation.
pub fn operating_profit(record: &FinancialRecord) -> f64 {
    record.net_revenues
        - record.cost_of_sales
        - record.sg_and_a_costs
        - record.rd_costs
        - record.depreciation_amortization
}

fn growth_pct(prior: f64, current: f64) -> Option<f64> {
    if prior == 0.0 {
        None
    } else {
        Some((current / prior - 1.0) * 100.0)
    }
}

fn ratio_pct(numerator: f64, revenue: f64) -> Option<f64> {
    if revenue == 0.0 {
        None
    } else {
        Some(numerator / revenue * 100.0)
    }
}
