#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid year in row {row}: '{value}' is not an integer")]
    InvalidYear { row: usize, value: String },

    #[error("Schema mismatch: missing column(s) {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Feature mismatch: estimator was fitted on {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Invalid value for '{field}' in year {year}: not a finite number")]
    InvalidValue { field: String, year: i32 },

    #[error("Duplicate year in dataset: {0}")]
    DuplicateYear(i32),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Estimator has not been fitted")]
    NotFitted,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
