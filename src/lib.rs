//! `biblio-reports` cleans library loan and overdue-item ("pending")
//! spreadsheet exports and re-emits per-branch workbooks.
//!
//! One input file flows through a fixed pipeline:
//!
//! 1. [`report::classify`] decides from the filename whether the export is a
//!    loan or a pending report (anything ambiguous is rejected)
//! 2. [`ingest::read_table`] loads the file (`.xlsx`/`.xls`/`.ods`/`.csv`)
//!    into an in-memory [`types::Table`]
//! 3. [`clean::clean`] validates required columns, drops rows without a usable
//!    email, truncates person names to their first token, and normalizes the
//!    remaining fields
//! 4. [`partition::partition`] splits the cleaned rows into a consolidated
//!    base sheet plus one sheet per configured branch
//! 5. [`output::write_workbook`] writes one workbook with one sheet per bucket
//!
//! ## Quick example: process one export
//!
//! ```no_run
//! use std::path::Path;
//!
//! use biblio_reports::config::ProcessingConfig;
//! use biblio_reports::observe::StdErrObserver;
//! use biblio_reports::pipeline::process_file;
//!
//! # fn main() -> Result<(), biblio_reports::ProcessingError> {
//! let config = ProcessingConfig::default();
//! let outcome = process_file(
//!     Path::new("Entrada/Relatorio_emprestimo_30.06.2025.xlsx"),
//!     Path::new("Saida"),
//!     &config,
//!     Some(&StdErrObserver),
//! )?;
//! println!("wrote {} sheets", outcome.sheet_counts.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: in-memory table model
//! - [`report`]: report types, filename classification, column schemas
//! - [`config`]: processing configuration and folder layout
//! - [`clean`]: row validation and cleaning rules
//! - [`partition`]: branch partitioning into named sheets
//! - [`ingest`]: spreadsheet/CSV readers
//! - [`output`]: workbook writer
//! - [`observe`]: structured processing events
//! - [`pipeline`]: per-file orchestration
//! - [`batch`]: folder discovery, batch runs, and file moving
//! - [`error`]: error types used across the crate

pub mod batch;
pub mod clean;
pub mod config;
pub mod error;
pub mod ingest;
pub mod observe;
pub mod output;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod types;

pub use error::{ProcessingError, ProcessingResult};
