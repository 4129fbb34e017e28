//! SQL builder with parameterized query construction.
//!
//! Values are bound through DuckDB's `?` placeholders, never interpolated.
//! Column names in the financial tables contain spaces, so builder methods
//! take column names as-is and quote them.
//!
//! # Example
//!
//! ```rust
//! use revenue_forecast::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("financials")
//!     .select(&["Year", "Net revenues"])
//!     .where_gte("Year", "2018")
//!     .order_by("Year", true)
//!     .limit(3)
//!     .build();
//! assert_eq!(params, vec!["2018"]);
//! ```

use crate::connection::quote_ident;

/// Builds parameterized SELECT statements over a single table.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: quote_ident(table),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| quote_ident(c)).collect();
        self
    }

    /// Add an equality condition: `"column" = ?`.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.push_condition(column, "=", value)
    }

    /// Add a greater-than-or-equal condition: `"column" >= ?`.
    pub fn where_gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.push_condition(column, ">=", value)
    }

    /// Add a less-than-or-equal condition: `"column" <= ?`.
    pub fn where_lte(&mut self, column: &str, value: &str) -> &mut Self {
        self.push_condition(column, "<=", value)
    }

    /// Add an ORDER BY column.
    pub fn order_by(&mut self, column: &str, ascending: bool) -> &mut Self {
        let dir = if ascending { "ASC" } else { "DESC" };
        self.order_by_cols.push(format!("{} {}", quote_ident(column), dir));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }

    fn push_condition(&mut self, column: &str, op: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("{} {} ?", quote_ident(column), op));
        self.params.push(value.to_string());
        self
    }
}
