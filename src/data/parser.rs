use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::{DataShapeError, Dataset};

/// Errors encountered while reading a tabular datafile.
#[derive(Error, Debug)]
pub enum DatafileError {
    /// Error from the underlying CSV reader
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// No header matched the requested column name
    #[error("column '{name}' not found among {header:?}")]
    MissingColumn { name: String, header: Vec<String> },
    /// A cell could not be parsed as a number
    #[error("could not parse '{value}' as a number (column '{column}', data row {row})")]
    InvalidNumber {
        value: String,
        column: String,
        row: usize,
    },
    /// The parsed columns do not form a well-shaped dataset
    #[error(transparent)]
    Shape(#[from] DataShapeError),
}

/// The column names to extract from a datafile.
///
/// Header lookup is case- and whitespace-insensitive, so
/// `" Time (Minutes)"` matches a spec of `"time (minutes)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub time: String,
    pub glucose: String,
    pub insulin: String,
}

impl Default for ColumnSpec {
    /// The column names used by the IVGTT datafiles this crate ships with.
    fn default() -> Self {
        ColumnSpec {
            time: "time (minutes)".to_string(),
            glucose: "glucose level (mg/dl)".to_string(),
            insulin: "insulin level (μU/ml)".to_string(),
        }
    }
}

/// Read a CSV datafile and extract the three measured series as a [Dataset].
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `columns` - The time, glucose and insulin column names to resolve
///
/// # Errors
///
/// Returns a [DatafileError] on I/O or CSV problems, unresolvable columns,
/// non-numeric cells, or a malformed resulting dataset.
pub fn from_csv(path: impl AsRef<Path>, columns: &ColumnSpec) -> Result<Dataset, DatafileError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse(reader, columns)
}

/// Read a CSV datafile from any reader; see [from_csv].
pub fn from_reader<R: Read>(reader: R, columns: &ColumnSpec) -> Result<Dataset, DatafileError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    parse(reader, columns)
}

fn parse<R: Read>(mut reader: csv::Reader<R>, columns: &ColumnSpec) -> Result<Dataset, DatafileError> {
    let header = reader.headers()?.clone();
    let time_idx = resolve_column(&header, &columns.time)?;
    let glucose_idx = resolve_column(&header, &columns.glucose)?;
    let insulin_idx = resolve_column(&header, &columns.insulin)?;

    let mut time = Vec::new();
    let mut glucose = Vec::new();
    let mut insulin = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        time.push(parse_cell(&record, time_idx, &columns.time, row + 1)?);
        glucose.push(parse_cell(&record, glucose_idx, &columns.glucose, row + 1)?);
        insulin.push(parse_cell(&record, insulin_idx, &columns.insulin, row + 1)?);
    }

    debug!(rows = time.len(), "parsed datafile");
    Ok(Dataset::new(time, glucose, insulin)?)
}

fn resolve_column(header: &csv::StringRecord, name: &str) -> Result<usize, DatafileError> {
    let wanted = normalize(name);
    header
        .iter()
        .position(|column| normalize(column) == wanted)
        .ok_or_else(|| DatafileError::MissingColumn {
            name: name.to_string(),
            header: header.iter().map(str::to_string).collect(),
        })
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn parse_cell(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64, DatafileError> {
    let value = record.get(index).unwrap_or("");
    value
        .parse::<f64>()
        .map_err(|_| DatafileError::InvalidNumber {
            value: value.to_string(),
            column: column.to_string(),
            row,
        })
}
