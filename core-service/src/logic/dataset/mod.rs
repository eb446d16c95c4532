//! Dataset Module - Training Data Preparation
//!
//! Offline steps that turn the raw patient-parameters export into the
//! cleaned tables the model is trained on. Nothing here runs in the server.
//!
//! - `raw`: fixed six-column export → typed rows (unparseable numbers → missing)
//! - `stats`: null counts, describe table, correlation matrix
//! - `impute`: median/mode fill of a merged table → `processed_data.csv`

pub mod impute;
pub mod raw;
pub mod stats;


pub use impute::{ColumnKind, ImputationReport, Table};
pub use raw::{PatientParameters, RAW_COLUMNS};
pub use stats::{correlation_matrix, describe, CorrelationMatrix, Describe};

/// Cell spellings treated as missing when reading CSV
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw CSV cell counts as missing
pub fn is_null_token(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell.trim())
}

/// Lenient numeric coercion: anything that does not parse is missing
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    if is_null_token(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("dataset has no rows")]
    Empty,
}
