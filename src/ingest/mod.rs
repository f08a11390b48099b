//! Input file ingestion.
//!
//! [`read_table`] loads one export file into an in-memory
//! [`crate::types::Table`], picking the reader from the file extension. Unlike
//! the downstream cleaning step, ingestion is schema-free: every column in the
//! source is kept so the cleaner can decide what is required.

use std::path::Path;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::Table;

pub mod csv;
pub mod excel;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Spreadsheet/workbook formats read via calamine.
    Excel,
    /// Comma-separated values.
    Csv,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Read one input file into a [`Table`], dispatching on the file extension.
pub fn read_table(path: impl AsRef<Path>) -> ProcessingResult<Table> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|s| s.to_str())
        .and_then(InputFormat::from_extension)
        .ok_or_else(|| ProcessingError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

    match format {
        InputFormat::Excel => excel::read_excel_table(path),
        InputFormat::Csv => csv::read_csv_table(path),
    }
}

#[cfg(test)]
mod tests {
    use super::InputFormat;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(InputFormat::from_extension("XLSX"), Some(InputFormat::Excel));
        assert_eq!(InputFormat::from_extension("xls"), Some(InputFormat::Excel));
        assert_eq!(InputFormat::from_extension("ods"), Some(InputFormat::Excel));
        assert_eq!(InputFormat::from_extension("csv"), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_extension("pdf"), None);
    }
}
