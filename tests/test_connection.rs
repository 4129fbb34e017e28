//! Connection integration tests: raw SQL execution and table registration.

mod common;

use revenue_forecast::models::{FinancialRecord, RecordOrigin, TimelineRecord};
use revenue_forecast::Connection;

fn sample_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.register_records("financials", &common::sample_records())
        .unwrap();
    conn
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_rows_keyed_by_column() {
    let conn = sample_db();

    let rows = conn
        .execute(
            r#"SELECT "Year", "Net revenues" FROM financials ORDER BY "Year""#,
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["Year"], 2014);
    assert_eq!(rows[9]["Net revenues"], 5650.0);
}

#[test]
fn execute_with_params() {
    let conn = sample_db();

    let rows = conn
        .execute(
            r#"SELECT * FROM financials WHERE "Year" >= ?"#,
            &["2021".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn execute_into_round_trips_records() {
    let conn = sample_db();

    let records: Vec<FinancialRecord> = conn
        .execute_into(r#"SELECT * FROM financials ORDER BY "Year""#, &[])
        .unwrap();
    assert_eq!(records, common::sample_records());
}

#[test]
fn raw_connection_sees_registered_tables() {
    let conn = sample_db();

    let count: i64 = conn
        .raw()
        .query_row("SELECT COUNT(*) FROM financials", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 10);
}

// ---------------------------------------------------------------------------
// execute_scalar
// ---------------------------------------------------------------------------

#[test]
fn execute_scalar_returns_single_value() {
    let conn = sample_db();

    let result = conn
        .execute_scalar("SELECT COUNT(*) FROM financials", &[])
        .unwrap();
    assert_eq!(result.unwrap().as_i64().unwrap(), 10);
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let conn = sample_db();

    let result = conn
        .execute_scalar(
            r#"SELECT "Year" FROM financials WHERE "Year" = ?"#,
            &["1999".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Table registration
// ---------------------------------------------------------------------------

#[test]
fn csv_table_keeps_header_names_and_text_values() {
    let conn = Connection::open_in_memory().unwrap();
    let file = common::write_csv("Year,Net revenues\n2014,2489\n2015,2578\n");

    conn.register_table_from_csv("upload", file.path().to_str().unwrap())
        .unwrap();

    assert_eq!(conn.columns("upload").unwrap(), vec!["Year", "Net revenues"]);
    let rows = conn.execute("SELECT * FROM upload", &[]).unwrap();
    assert_eq!(rows[1]["Net revenues"], "2578");
}

#[test]
fn register_records_replaces_existing_table() {
    let conn = sample_db();
    let records = common::sample_records();
    conn.register_records("financials", &records[..2]).unwrap();

    let count = conn
        .execute_scalar("SELECT COUNT(*) FROM financials", &[])
        .unwrap();
    assert_eq!(count.unwrap().as_i64().unwrap(), 2);
}

#[test]
fn register_timeline_adds_origin_column() {
    let conn = Connection::open_in_memory().unwrap();
    let records = common::sample_records();
    let timeline: Vec<TimelineRecord> = records
        .iter()
        .enumerate()
        .map(|(i, r)| TimelineRecord {
            record: r.clone(),
            origin: if i < 8 {
                RecordOrigin::Historical
            } else {
                RecordOrigin::Forecast
            },
        })
        .collect();
    conn.register_timeline("timeline", &timeline).unwrap();

    let cols = conn.columns("timeline").unwrap();
    assert_eq!(cols.last().map(String::as_str), Some("origin"));

    let forecasts = conn
        .execute_scalar(
            "SELECT COUNT(*) FROM timeline WHERE origin = ?",
            &["forecast".to_string()],
        )
        .unwrap();
    assert_eq!(forecasts.unwrap().as_i64().unwrap(), 2);
}

// ---------------------------------------------------------------------------
// has_table / tables
// ---------------------------------------------------------------------------

#[test]
fn has_table_returns_false_initially() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(!conn.has_table("financials"));
    assert!(conn.tables().is_empty());
}

#[test]
fn tables_lists_registered_names_sorted() {
    let conn = sample_db();
    conn.register_records("archive", &common::sample_records())
        .unwrap();
    assert!(conn.has_table("financials"));
    assert_eq!(conn.tables(), vec!["archive", "financials"]);
}
