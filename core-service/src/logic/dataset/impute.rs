//! Missing-value imputation for the merged training table
//!
//! A column is numeric when every present cell parses as a number.
//! Numeric gaps take the column median, other gaps the most frequent value
//! (smallest value on ties). Columns with no present value stay empty.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use super::stats::median;
use super::{coerce_numeric, is_null_token, DatasetError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Fill applied to one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFill {
    pub column: String,
    pub kind: ColumnKind,
    pub filled: usize,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputationReport {
    pub rows: usize,
    pub fills: Vec<ColumnFill>,
}

impl ImputationReport {
    pub fn total_filled(&self) -> usize {
        self.fills.iter().map(|f| f.filled).sum()
    }
}

/// A CSV table with missing cells as `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn read_from<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|cell| (!is_null_token(cell)).then(|| cell.to_string()))
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    pub fn read(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        let table = Self::read_from(file)?;
        log::info!(
            "Read {} rows x {} columns from {}",
            table.rows.len(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write(&self, path: &Path) -> Result<(), DatasetError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)?;
        log::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column_kind(&self, index: usize) -> ColumnKind {
        let all_numeric = self
            .column(index)
            .flatten()
            .all(|cell| coerce_numeric(cell).is_some());
        if all_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Missing cells per column, in header order
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        (0..self.headers.len())
            .map(|i| {
                let nulls = self.column(i).filter(|c| c.is_none()).count();
                (self.headers[i].clone(), nulls)
            })
            .collect()
    }

    fn fill_value(&self, index: usize, kind: ColumnKind) -> Option<String> {
        match kind {
            ColumnKind::Numeric => {
                let values: Vec<Option<f64>> =
                    self.column(index).map(|c| c.and_then(coerce_numeric)).collect();
                median(&values).map(|m| m.to_string())
            }
            ColumnKind::Categorical => mode(self.column(index).flatten()),
        }
    }

    /// Fill every missing cell in place
    pub fn impute(&mut self) -> ImputationReport {
        let mut report = ImputationReport {
            rows: self.rows.len(),
            fills: Vec::new(),
        };

        for index in 0..self.headers.len() {
            let nulls = self.column(index).filter(|c| c.is_none()).count();
            if nulls == 0 {
                continue;
            }

            let kind = self.column_kind(index);
            let Some(value) = self.fill_value(index, kind) else {
                log::warn!(
                    "Column '{}' has no values to impute from, left empty",
                    self.headers[index]
                );
                continue;
            };

            for row in &mut self.rows {
                if row.len() <= index {
                    row.resize(index + 1, None);
                }
                if row[index].is_none() {
                    row[index] = Some(value.clone());
                }
            }

            log::debug!(
                "Filled {} cells of '{}' ({:?}) with {}",
                nulls,
                self.headers[index],
                kind,
                value
            );
            report.fills.push(ColumnFill {
                column: self.headers[index].clone(),
                kind,
                filled: nulls,
                value,
            });
        }

        report
    }
}

/// Most frequent value, smallest on ties
fn mode<'a, I: Iterator<Item = &'a str>>(cells: I) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for cell in cells {
        *counts.entry(cell).or_insert(0) += 1;
    }

    let best = counts.values().copied().max()?;
    // BTreeMap iterates in ascending key order
    counts
        .into_iter()
        .find(|(_, count)| *count == best)
        .map(|(value, _)| value.to_string())
}
