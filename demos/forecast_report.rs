//! Prints a five-year revenue projection for the bundled sample, with KPIs.
//!
//! Set `RUST_LOG=debug` to see each projected year as it is computed.

use revenue_forecast::models::{RecordOrigin, SingleYearOutcome};
use revenue_forecast::{Dashboard, ForecastRequest, InventoryInput, ProductEntry};

fn main() -> revenue_forecast::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let dashboard = Dashboard::builder().build()?;
    eprintln!("{dashboard}");

    let inventory = InventoryInput::new(
        1000.0,
        vec![
            ProductEntry::new("City car", 14_500.0, 20)?,
            ProductEntry::new("Grand tourer", 210_000.0, 5)?,
        ],
    )?;
    println!(
        "Products: total value EUR {:.2}, capacity usage {:.2}%",
        inventory.total_value(),
        inventory.capacity_usage_pct()
    );

    let run = dashboard.forecast(&ForecastRequest::from_inventory(5, &inventory))?;
    let kpis = dashboard.kpis(&run);

    println!();
    println!(
        "{:<6} {:<10} {:>12} {:>10} {:>10} {:>10} {:>8}",
        "Year", "Origin", "Net revenues", "Growth %", "Gross %", "Oper. %", "R&D %"
    );
    let pct = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".into());
    for (entry, kpi) in run.timeline.iter().zip(&kpis) {
        let origin = match entry.origin {
            RecordOrigin::Historical => "actual",
            RecordOrigin::Forecast => "forecast",
        };
        println!(
            "{:<6} {:<10} {:>12.2} {:>10} {:>10} {:>10} {:>8}",
            entry.record.year,
            origin,
            entry.record.net_revenues,
            pct(kpi.revenue_growth_pct),
            pct(kpi.gross_margin_pct),
            pct(kpi.operating_margin_pct),
            pct(kpi.rd_rate_pct),
        );
    }

    let next_year = run.historical().last().map(|r| r.year + 1).unwrap_or_default();
    println!();
    match dashboard.forecast_single_year(next_year, inventory.total_quantity() as f64)? {
        SingleYearOutcome::Predicted(f) => println!(
            "Single-year check for {}: EUR {:.2} (validation MAE {:.2} on {} held-out years)",
            f.year, f.predicted_net_revenues, f.validation_mae, f.validation_size
        ),
        SingleYearOutcome::OutOfRange { requested, supported } => println!(
            "Year {requested} is not supported; only {supported} can be forecast"
        ),
    }

    Ok(())
}
