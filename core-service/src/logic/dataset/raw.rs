//! Raw patient-parameters export
//!
//! The export carries a two-line header: the first line is replaced by the
//! fixed column names, the second arrives as the first data row and is dropped.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{coerce_numeric, is_null_token, DatasetError};

/// Column names assigned to the raw export, in file order
pub const RAW_COLUMNS: [&str; 6] = ["No", "Age", "Gender", "Height", "Weight", "Physical Activity"];

/// Columns coerced to numbers
pub const NUMERIC_COLUMNS: [&str; 4] = ["Age", "Height", "Weight", "Physical Activity"];

/// One cleaned row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientParameters {
    #[serde(rename = "No")]
    pub no: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<f64>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Height")]
    pub height: Option<f64>,
    #[serde(rename = "Weight")]
    pub weight: Option<f64>,
    #[serde(rename = "Physical Activity")]
    pub physical_activity: Option<f64>,
}

impl PatientParameters {
    fn from_record(record: &csv::StringRecord) -> Self {
        let text = |i: usize| {
            record
                .get(i)
                .filter(|cell| !is_null_token(cell))
                .map(|cell| cell.trim().to_string())
        };
        let number = |i: usize| record.get(i).and_then(coerce_numeric);

        Self {
            no: text(0),
            age: number(1),
            gender: text(2),
            height: number(3),
            weight: number(4),
            physical_activity: number(5),
        }
    }

    /// Value of a numeric column by name
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "Age" => self.age,
            "Height" => self.height,
            "Weight" => self.weight,
            "Physical Activity" => self.physical_activity,
            _ => None,
        }
    }

    fn is_null(&self, column: &str) -> bool {
        match column {
            "No" => self.no.is_none(),
            "Gender" => self.gender.is_none(),
            other => self.numeric(other).is_none(),
        }
    }
}

/// Read and clean a raw export from any reader
pub fn read_raw_from<R: Read>(reader: R) -> Result<Vec<PatientParameters>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let found = csv_reader.headers()?.len();
    if found != RAW_COLUMNS.len() {
        return Err(DatasetError::ColumnCount {
            expected: RAW_COLUMNS.len(),
            found,
        });
    }

    let mut rows = Vec::new();
    for record in csv_reader.records().skip(1) {
        rows.push(PatientParameters::from_record(&record?));
    }

    log::info!("Read {} patient rows from raw export", rows.len());
    Ok(rows)
}

/// Read and clean a raw export file
pub fn read_raw(path: &Path) -> Result<Vec<PatientParameters>, DatasetError> {
    let file = std::fs::File::open(path)?;
    read_raw_from(file)
}

/// Write cleaned rows with the fixed header
pub fn write_cleaned_to<W: Write>(
    rows: &[PatientParameters],
    writer: W,
) -> Result<(), DatasetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv_writer.write_record(RAW_COLUMNS)?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_cleaned(rows: &[PatientParameters], path: &Path) -> Result<(), DatasetError> {
    let file = std::fs::File::create(path)?;
    write_cleaned_to(rows, file)?;
    log::info!("Wrote {} cleaned rows to {}", rows.len(), path.display());
    Ok(())
}

/// Missing values per column, in file order
pub fn null_counts(rows: &[PatientParameters]) -> Vec<(&'static str, usize)> {
    RAW_COLUMNS
        .iter()
        .map(|column| (*column, rows.iter().filter(|r| r.is_null(column)).count()))
        .collect()
}

/// The numeric columns as series, for statistics
pub fn numeric_series(rows: &[PatientParameters]) -> Vec<(&'static str, Vec<Option<f64>>)> {
    NUMERIC_COLUMNS
        .iter()
        .map(|column| (*column, rows.iter().map(|r| r.numeric(column)).collect()))
        .collect()
}
