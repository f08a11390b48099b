//! Structured processing events.
//!
//! The pipeline emits events (file started, rows dropped and why, per-sheet
//! row counts, file succeeded/failed) but owns no log storage or formatting;
//! observers decide where events go.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::clean::CleanStats;
use crate::error::ProcessingError;
use crate::report::ReportType;

/// Severity classification used for failure events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the file failed).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

/// Maps an error to its severity: infrastructure failures are critical, data
/// failures are plain errors.
pub fn severity_for_error(error: &ProcessingError) -> Severity {
    match error {
        ProcessingError::Io(_) => Severity::Critical,
        ProcessingError::Excel(_)
        | ProcessingError::Csv(_)
        | ProcessingError::Workbook(_)
        | ProcessingError::UnclassifiableFile { .. }
        | ProcessingError::MissingColumns { .. }
        | ProcessingError::UnsupportedFormat { .. }
        | ProcessingError::InvalidInput { .. } => Severity::Error,
    }
}

/// Why a batch of rows was excluded from the cleaned output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Email cell was empty, whitespace-only, or a missing-value sentinel.
    MissingEmail,
    /// Row belongs to the internal system account.
    InternalAccount,
    /// Exact duplicate of an earlier row.
    Duplicate,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::MissingEmail => "missing email",
            DropReason::InternalAccount => "internal account",
            DropReason::Duplicate => "duplicate",
        };
        f.write_str(s)
    }
}

/// Context about the file currently being processed.
#[derive(Debug, Clone)]
pub struct FileContext {
    /// The input path.
    pub path: PathBuf,
    /// Classified report type; `None` until (or unless) classification ran.
    pub report_type: Option<ReportType>,
}

impl FileContext {
    fn type_label(&self) -> &'static str {
        self.report_type.map(|t| t.label()).unwrap_or("unknown")
    }
}

/// Observer interface for processing outcomes.
///
/// Implementors can record logs, metrics, or trigger alerts.
pub trait ProcessObserver: Send + Sync {
    /// Called when a file's processing starts.
    fn on_file_started(&self, _ctx: &FileContext) {}

    /// Called once per drop reason with the number of rows excluded.
    fn on_rows_dropped(&self, _ctx: &FileContext, _reason: DropReason, _count: usize) {}

    /// Called after partitioning, once per output sheet.
    fn on_sheet_written(&self, _ctx: &FileContext, _sheet: &str, _rows: usize) {}

    /// Called when the file's workbook has been written.
    fn on_file_succeeded(&self, _ctx: &FileContext, _stats: CleanStats) {}

    /// Called when processing the file failed.
    fn on_file_failed(&self, _ctx: &FileContext, _severity: Severity, _error: &ProcessingError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ProcessObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ProcessObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ProcessObserver for CompositeObserver {
    fn on_file_started(&self, ctx: &FileContext) {
        for o in &self.observers {
            o.on_file_started(ctx);
        }
    }

    fn on_rows_dropped(&self, ctx: &FileContext, reason: DropReason, count: usize) {
        for o in &self.observers {
            o.on_rows_dropped(ctx, reason, count);
        }
    }

    fn on_sheet_written(&self, ctx: &FileContext, sheet: &str, rows: usize) {
        for o in &self.observers {
            o.on_sheet_written(ctx, sheet, rows);
        }
    }

    fn on_file_succeeded(&self, ctx: &FileContext, stats: CleanStats) {
        for o in &self.observers {
            o.on_file_succeeded(ctx, stats);
        }
    }

    fn on_file_failed(&self, ctx: &FileContext, severity: Severity, error: &ProcessingError) {
        for o in &self.observers {
            o.on_file_failed(ctx, severity, error);
        }
    }
}

/// Logs processing events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ProcessObserver for StdErrObserver {
    fn on_file_started(&self, ctx: &FileContext) {
        eprintln!(
            "[process][start] type={} path={}",
            ctx.type_label(),
            ctx.path.display()
        );
    }

    fn on_rows_dropped(&self, ctx: &FileContext, reason: DropReason, count: usize) {
        eprintln!(
            "[process][dropped] path={} reason={reason} rows={count}",
            ctx.path.display()
        );
    }

    fn on_sheet_written(&self, ctx: &FileContext, sheet: &str, rows: usize) {
        eprintln!(
            "[process][sheet] path={} sheet='{sheet}' rows={rows}",
            ctx.path.display()
        );
    }

    fn on_file_succeeded(&self, ctx: &FileContext, stats: CleanStats) {
        eprintln!(
            "[process][ok] type={} path={} rows_in={} rows_out={}",
            ctx.type_label(),
            ctx.path.display(),
            stats.rows_in,
            stats.rows_out
        );
    }

    fn on_file_failed(&self, ctx: &FileContext, severity: Severity, error: &ProcessingError) {
        eprintln!(
            "[process][{severity:?}] type={} path={} err={error}",
            ctx.type_label(),
            ctx.path.display()
        );
    }
}

/// Appends processing events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are
    /// ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ProcessObserver for FileObserver {
    fn on_file_started(&self, ctx: &FileContext) {
        self.append_line(&format!(
            "{} start type={} path={}",
            unix_ts(),
            ctx.type_label(),
            ctx.path.display()
        ));
    }

    fn on_rows_dropped(&self, ctx: &FileContext, reason: DropReason, count: usize) {
        self.append_line(&format!(
            "{} dropped path={} reason={reason} rows={count}",
            unix_ts(),
            ctx.path.display()
        ));
    }

    fn on_sheet_written(&self, ctx: &FileContext, sheet: &str, rows: usize) {
        self.append_line(&format!(
            "{} sheet path={} sheet='{sheet}' rows={rows}",
            unix_ts(),
            ctx.path.display()
        ));
    }

    fn on_file_succeeded(&self, ctx: &FileContext, stats: CleanStats) {
        self.append_line(&format!(
            "{} ok type={} path={} rows_in={} rows_out={}",
            unix_ts(),
            ctx.type_label(),
            ctx.path.display(),
            stats.rows_in,
            stats.rows_out
        ));
    }

    fn on_file_failed(&self, ctx: &FileContext, severity: Severity, error: &ProcessingError) {
        self.append_line(&format!(
            "{} fail severity={severity:?} type={} path={} err={error}",
            unix_ts(),
            ctx.type_label(),
            ctx.path.display()
        ));
    }
}

pub(crate) fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
