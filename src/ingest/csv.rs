//! CSV ingestion.
//!
//! Some branch systems export CSV rather than a workbook; the cleaning rules
//! are format-agnostic, so CSV cells are ingested as text (or null when
//! empty) and flow through the same pipeline.

use std::path::Path;

use crate::error::ProcessingResult;
use crate::types::{Cell, Table};

/// Read a headered CSV file into a [`Table`].
pub fn read_csv_table(path: impl AsRef<Path>) -> ProcessingResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> ProcessingResult<Table> {
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let width = columns.len();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<Cell> = Vec::with_capacity(width);
        for col_idx in 0..width {
            let raw = record.get(col_idx).unwrap_or("");
            if raw.trim().is_empty() {
                row.push(Cell::Null);
            } else {
                row.push(Cell::Text(raw.to_string()));
            }
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}
