//! End-to-end tests through the Dashboard facade.

mod common;

use revenue_forecast::models::{Field, RecordOrigin, SingleYearOutcome};
use revenue_forecast::{
    Dashboard, ForecastConfig, ForecastError, ForecastRequest, InventoryInput, ProductEntry,
};
use std::fs;

#[test]
fn default_build_loads_sample() {
    let dashboard = Dashboard::builder().build().unwrap();
    assert_eq!(dashboard.history().len(), 10);
    assert!(dashboard.tables().contains(&"financials".to_string()));

    let text = dashboard.to_string();
    assert!(text.contains("years=2014-2023"));
}

#[test]
fn history_between_queries_the_table() {
    let dashboard = Dashboard::builder().build().unwrap();
    let records = dashboard.history_between(2018, 2020).unwrap();
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2018, 2019, 2020]);
    assert_eq!(records[1].net_revenues, 3500.0);
}

#[test]
fn history_between_keeps_malformed_cells_as_nan() {
    let csv = common::sample_csv().replacen("\n2019,3500,2832,", "\n2019,3500,n/a,", 1);
    let file = common::write_csv(&csv);
    let dashboard = Dashboard::builder()
        .dataset_csv(file.path())
        .build()
        .unwrap();

    let records = dashboard.history_between(2014, 2023).unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[5].year, 2019);
    assert!(records[5].cost_of_sales.is_nan());

    // The bad cell is reported by name once a forecast needs it
    let err = dashboard.forecast(&ForecastRequest::new(1, 0.0)).unwrap_err();
    match err {
        ForecastError::InvalidValue { field, year } => {
            assert_eq!(field, "Cost of sales");
            assert_eq!(year, 2019);
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn history_kpis_cover_every_loaded_year() {
    let dashboard = Dashboard::builder().build().unwrap();
    let kpis = dashboard.history_kpis();
    assert_eq!(kpis.len(), 10);
    assert_eq!(kpis[0].year, 2014);
    assert!(kpis[0].revenue_growth_pct.is_none());
    assert!(kpis[1..].iter().all(|k| k.revenue_growth_pct.is_some()));
    assert!(kpis.iter().all(|k| k.origin == RecordOrigin::Historical));
}

#[test]
fn forecast_five_years_end_to_end() {
    let dashboard = Dashboard::builder().build().unwrap();
    let run = dashboard.forecast(&ForecastRequest::new(5, 0.0)).unwrap();

    assert_eq!(run.timeline.len(), 15);
    let mut cost = 4379.0;
    for record in run.forecasts() {
        cost *= 1.05;
        assert!(common::approx_eq(record.cost_of_sales, cost));
        assert_eq!(record.finished_goods_inventory, 234.0);
    }

    let kpis = dashboard.kpis(&run);
    assert_eq!(kpis.len(), 15);
    assert!(kpis[0].revenue_growth_pct.is_none());
}

#[test]
fn forecast_registers_timeline_table() {
    let dashboard = Dashboard::builder().build().unwrap();
    dashboard.forecast(&ForecastRequest::new(3, 0.0)).unwrap();
    assert!(dashboard.tables().contains(&"forecast_timeline".to_string()));

    let rows = dashboard
        .sql(
            r#"SELECT "Year" FROM forecast_timeline WHERE origin = ? ORDER BY "Year""#,
            &["forecast".to_string()],
        )
        .unwrap();
    let years: Vec<i64> = rows.iter().map(|r| r["Year"].as_i64().unwrap()).collect();
    assert_eq!(years, vec![2024, 2025, 2026]);

    // A second run replaces the first
    dashboard.forecast(&ForecastRequest::new(1, 0.0)).unwrap();
    let rows = dashboard
        .sql("SELECT COUNT(*) AS n FROM forecast_timeline", &[])
        .unwrap();
    assert_eq!(rows[0]["n"], 11);
}

#[test]
fn forecast_from_product_input() {
    let dashboard = Dashboard::builder().build().unwrap();
    let inventory = InventoryInput::new(
        1000.0,
        vec![
            ProductEntry::new("City car", 15_000.0, 12).unwrap(),
            ProductEntry::new("SUV", 40_000.0, 8).unwrap(),
        ],
    )
    .unwrap();
    let run = dashboard
        .forecast(&ForecastRequest::from_inventory(2, &inventory))
        .unwrap();

    let finished: Vec<f64> = run.forecasts().map(|r| r.finished_goods_inventory).collect();
    assert_eq!(finished, vec![254.0, 274.0]);
}

#[test]
fn forecast_rejects_zero_horizon() {
    let dashboard = Dashboard::builder().build().unwrap();
    let err = dashboard.forecast(&ForecastRequest::new(0, 0.0)).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidArgument(_)));
}

#[test]
fn single_year_through_dashboard() {
    let dashboard = Dashboard::builder().build().unwrap();
    assert!(matches!(
        dashboard.forecast_single_year(2024, 0.0).unwrap(),
        SingleYearOutcome::Predicted(_)
    ));
    assert!(matches!(
        dashboard.forecast_single_year(2023, 0.0).unwrap(),
        SingleYearOutcome::OutOfRange { .. }
    ));
}

#[test]
fn build_from_uploaded_csv() {
    let file = common::write_csv(&common::sample_csv());
    let dashboard = Dashboard::builder()
        .dataset_csv(file.path())
        .build()
        .unwrap();
    assert_eq!(dashboard.history(), &common::sample());
    assert!(dashboard.tables().contains(&"financials_upload".to_string()));
}

#[test]
fn build_reports_schema_mismatch_without_panicking() {
    let columns: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|f| *f != Field::CarUnitsSold)
        .collect();
    let file = common::write_csv(&common::to_csv(&common::sample_records(), &columns));

    let result = Dashboard::builder().dataset_csv(file.path()).build();
    let err = result.err().unwrap();
    assert!(matches!(err, ForecastError::SchemaMismatch { .. }));
    assert!(err.to_string().contains("Car sales (in unit)"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast.json");
    fs::write(&path, r#"{"growth_rate": 0.1, "forest": {"n_estimators": 10}}"#).unwrap();

    let config = ForecastConfig::from_json_file(&path).unwrap();
    assert_eq!(config.growth_rate, 0.1);
    assert_eq!(config.wip_share, 0.5);
    assert_eq!(config.raw_materials_share, 0.3);
    assert_eq!(config.forest.n_estimators, 10);
    assert_eq!(config.forest.seed, 42);

    let dashboard = Dashboard::builder().config(config).build().unwrap();
    let run = dashboard.forecast(&ForecastRequest::new(1, 0.0)).unwrap();
    let next = run.forecasts().next().unwrap();
    assert!(common::approx_eq(next.cost_of_sales, 4379.0 * 1.1));
}

#[test]
fn config_file_with_invalid_rates_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast.json");
    fs::write(&path, r#"{"growth_rate": -1.5}"#).unwrap();
    let err = ForecastConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidArgument(_)));

    fs::write(&path, r#"{"wip_share": -0.5}"#).unwrap();
    let err = ForecastConfig::from_json_file(&path).unwrap_err();
    assert!(err.to_string().contains("wip_share"));
}

#[test]
fn build_rejects_invalid_config() {
    let bad = [
        ForecastConfig {
            growth_rate: f64::NAN,
            ..ForecastConfig::default()
        },
        ForecastConfig {
            raw_materials_share: f64::INFINITY,
            ..ForecastConfig::default()
        },
        ForecastConfig {
            validation_fraction: 1.0,
            ..ForecastConfig::default()
        },
    ];
    for config in bad {
        let err = Dashboard::builder().config(config).build().err().unwrap();
        assert!(matches!(err, ForecastError::InvalidArgument(_)));
    }

    // Contraction is a legitimate assumption
    let shrinking = ForecastConfig {
        growth_rate: -0.05,
        ..ForecastConfig::default()
    };
    assert!(Dashboard::builder().config(shrinking).build().is_ok());
}

#[test]
fn gallery_requires_an_image_directory() {
    let dashboard = Dashboard::builder().build().unwrap();
    let err = dashboard.gallery(&["Revenues"]).unwrap_err();
    assert!(matches!(err, ForecastError::NotFound(_)));
}

#[test]
fn gallery_pairs_captions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1_revenues.png"), b"x").unwrap();
    fs::write(dir.path().join("2_costs.png"), b"x").unwrap();

    let dashboard = Dashboard::builder().image_dir(dir.path()).build().unwrap();
    let images = dashboard.gallery(&["Net revenues"]).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].caption.as_deref(), Some("Net revenues"));
    assert!(images[1].caption.is_none());
}
