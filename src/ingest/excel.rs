//! Spreadsheet ingestion via calamine.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{Cell, Table};

/// Read the first sheet of a workbook (`.xlsx`, `.xls`, `.ods`, ...) into a
/// [`Table`].
///
/// Behavior:
/// - The first non-empty row is the header; leading blank rows are skipped
/// - All columns are kept, named by their header cell text
/// - Cells are converted to [`Cell`] values; cell errors become `Null`
pub fn read_excel_table(path: impl AsRef<Path>) -> ProcessingResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ProcessingError::InvalidInput {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut header_row_idx: Option<usize> = None;
    let mut columns: Vec<String> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if row.iter().any(|c| !matches!(c, Data::Empty)) {
            header_row_idx = Some(idx0);
            columns = row.iter().map(header_cell_text).collect();
            break;
        }
    }
    let header_row_idx = header_row_idx.ok_or_else(|| ProcessingError::InvalidInput {
        message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
    })?;

    let width = columns.len();
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 <= header_row_idx {
            continue;
        }
        let mut out_row: Vec<Cell> = Vec::with_capacity(width);
        for col_idx in 0..width {
            let data = row.get(col_idx).unwrap_or(&Data::Empty);
            out_row.push(convert_cell(data));
        }
        rows.push(out_row);
    }

    Ok(Table::new(columns, rows))
}

fn header_cell_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // A cell-level formula error carries no usable value.
        Data::Error(_) => Cell::Null,
    }
}
