//! Delimited-text decoding with dynamic cell typing
//!
//! The first record is the header row and defines column names. Cells are
//! dynamically typed: values that parse as finite numbers become
//! [`RawValue::Number`], blank cells become [`RawValue::Empty`], everything
//! else stays text. Rows whose cells are all blank are skipped.

use plcal_core::{RawRow, RawValue};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Decoding errors with source context
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read journal export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode delimited text: {0}")]
    Csv(#[from] csv::Error),
}

/// Decode a journal export file into raw rows
pub fn read_rows_from_path(path: &Path, delimiter: u8) -> Result<Vec<RawRow>, LoadError> {
    let file = File::open(path)?;
    read_rows(file, delimiter)
}

/// Decode delimited text from any reader into raw rows
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut skipped_blank = 0usize;

    for record in csv_reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (idx, header) in headers.iter().enumerate() {
            let cell = record.get(idx).unwrap_or("");
            row.push(header.clone(), type_cell(cell));
        }
        if row.is_blank() {
            skipped_blank += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(
        rows = rows.len(),
        skipped_blank, "decoded journal export"
    );

    Ok(rows)
}

/// Dynamic typing for one cell
fn type_cell(cell: &str) -> RawValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return RawValue::Empty;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return RawValue::Number(n);
        }
    }
    RawValue::Text(cell.to_string())
}
