//! DuckDB connection wrapper with table registration and query execution.
//!
//! Uploaded delimited files are parsed by DuckDB's CSV reader, and loaded or
//! projected records are materialised as tables so they can be inspected with
//! plain SQL.

use crate::error::Result;
use crate::models::{Field, FinancialRecord, TimelineRecord};
use duckdb::{types::Value as DuckValue, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Wraps an in-memory DuckDB connection and tracks the tables registered on it.
pub struct Connection {
    conn: DuckDbConnection,
    registered_tables: RefCell<BTreeSet<String>>,
}

impl Connection {
    /// Open an in-memory DuckDB database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            registered_tables: RefCell::new(BTreeSet::new()),
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let column_names: Vec<String> = match rows.as_ref() {
            Some(stmt) => stmt.column_names().into_iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Create a table from a delimited text file with a header row.
    ///
    /// The delimiter is sniffed by DuckDB and every column is kept as
    /// VARCHAR, so numeric coercion stays with the caller.
    pub fn register_table_from_csv(&self, table_name: &str, csv_path: &str) -> Result<()> {
        let path_fwd = csv_path.replace('\\', "/").replace('\'', "''");
        let table = quote_ident(table_name);
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; \
             CREATE TABLE {table} AS SELECT * FROM read_csv('{path_fwd}', header = true, all_varchar = true)"
        ))?;
        self.registered_tables.borrow_mut().insert(table_name.to_string());
        info!(table = table_name, path = csv_path, "registered table from delimited file");
        Ok(())
    }

    /// Create (or replace) a table holding the given records, one row each.
    pub fn register_records(&self, table_name: &str, records: &[FinancialRecord]) -> Result<()> {
        self.create_financial_table(table_name, false)?;
        let sql = insert_sql(table_name, false);
        let mut stmt = self.conn.prepare(&sql)?;
        for record in records {
            stmt.execute(duckdb::params_from_iter(record_values(record)))?;
        }
        self.registered_tables.borrow_mut().insert(table_name.to_string());
        debug!(table = table_name, rows = records.len(), "registered records");
        Ok(())
    }

    /// Create (or replace) a table holding a timeline, with an `origin` column.
    pub fn register_timeline(&self, table_name: &str, timeline: &[TimelineRecord]) -> Result<()> {
        self.create_financial_table(table_name, true)?;
        let sql = insert_sql(table_name, true);
        let mut stmt = self.conn.prepare(&sql)?;
        for entry in timeline {
            let mut values = record_values(&entry.record);
            values.push(DuckValue::Text(entry.origin.as_str().to_string()));
            stmt.execute(duckdb::params_from_iter(values))?;
        }
        self.registered_tables.borrow_mut().insert(table_name.to_string());
        debug!(table = table_name, rows = timeline.len(), "registered timeline");
        Ok(())
    }

    /// Column names of a table or view, in declaration order.
    pub fn columns(&self, table_name: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT column_name FROM (DESCRIBE SELECT * FROM {})",
            quote_ident(table_name)
        ))?;

        let mut rows = stmt.query([])?;
        let mut cols: Vec<String> = Vec::new();
        while let Some(row) = rows.next()? {
            cols.push(row.get(0)?);
        }
        Ok(cols)
    }

    /// Check whether a table has been registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return the names of all registered tables, sorted.
    pub fn tables(&self) -> Vec<String> {
        self.registered_tables.borrow().iter().cloned().collect()
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn create_financial_table(&self, table_name: &str, with_origin: bool) -> Result<()> {
        let mut cols: Vec<String> = Field::ALL
            .iter()
            .map(|f| {
                let ty = if *f == Field::Year { "INTEGER" } else { "DOUBLE" };
                format!("{} {}", quote_ident(f.column()), ty)
            })
            .collect();
        if with_origin {
            cols.push("origin VARCHAR".to_string());
        }
        let table = quote_ident(table_name);
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({})",
            cols.join(", ")
        ))?;
        Ok(())
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_sql(table_name: &str, with_origin: bool) -> String {
    let n = Field::ALL.len() + usize::from(with_origin);
    let placeholders: Vec<&str> = (0..n).map(|_| "?").collect();
    format!(
        "INSERT INTO {} VALUES ({})",
        quote_ident(table_name),
        placeholders.join(", ")
    )
}

fn record_values(record: &FinancialRecord) -> Vec<DuckValue> {
    Field::ALL
        .iter()
        .map(|f| match f {
            Field::Year => DuckValue::Int(record.year),
            other => DuckValue::Double(record.get(*other)),
        })
        .collect()
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; fall back to a string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        _ => serde_json::Value::Null,
    }
}
