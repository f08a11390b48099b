use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for processing operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Error type shared across classification, ingestion, cleaning, and output.
///
/// Row-level rejections (e.g. rows without a usable email) are not errors;
/// they are dropped locally and surfaced through
/// [`crate::clean::CleanStats`] and observer events.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet read error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV read error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook write error.
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// The filename matched zero or both report-type keyword sets; the file
    /// must not be processed under a guessed type.
    #[error("cannot classify report type from filename '{filename}'")]
    UnclassifiableFile { filename: String },

    /// Columns required for the report type are absent from the header.
    /// Fatal for the whole file; no rows are processed.
    #[error("missing required columns {missing:?}. available: {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// The file extension maps to no supported input format.
    #[error("unsupported input format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The input is structurally unusable (e.g. no header row).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}
