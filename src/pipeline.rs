//! Per-file processing pipeline.
//!
//! One input file flows through classify → read → clean → partition → write,
//! fully and synchronously, before the next file is considered. Row-level
//! issues are recovered inside [`crate::clean`]; any error here aborts only
//! this file.

use std::path::{Path, PathBuf};

use crate::clean::{clean, CleanStats};
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult};
use crate::ingest;
use crate::observe::{severity_for_error, DropReason, FileContext, ProcessObserver};
use crate::output::write_workbook;
use crate::partition::partition;
use crate::report::{classify, ReportType};

/// Result of successfully processing one input file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Classified report type of the input.
    pub report_type: ReportType,
    /// Cleaning counters.
    pub stats: CleanStats,
    /// Output sheet names and their row counts, in workbook order.
    pub sheet_counts: Vec<(String, usize)>,
    /// Path of the written workbook.
    pub output_path: PathBuf,
}

/// Process one export file end to end and write its workbook into
/// `output_dir`.
///
/// The output filename is the report's stem plus a timestamp, suffixed on
/// collision, so neither repeated runs nor two same-type files in one batch
/// pass overwrite each other's workbook. All observer events for this file
/// are emitted here; the caller only decides what to do with the input file
/// afterwards (see [`crate::batch`]).
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    config: &ProcessingConfig,
    observer: Option<&dyn ProcessObserver>,
) -> ProcessingResult<FileOutcome> {
    let mut ctx = FileContext {
        path: input.to_path_buf(),
        report_type: None,
    };

    match run_pipeline(input, output_dir, config, observer, &mut ctx) {
        Ok(outcome) => {
            if let Some(obs) = observer {
                obs.on_file_succeeded(&ctx, outcome.stats);
            }
            Ok(outcome)
        }
        Err(error) => {
            if let Some(obs) = observer {
                obs.on_file_failed(&ctx, severity_for_error(&error), &error);
            }
            Err(error)
        }
    }
}

fn run_pipeline(
    input: &Path,
    output_dir: &Path,
    config: &ProcessingConfig,
    observer: Option<&dyn ProcessObserver>,
    ctx: &mut FileContext,
) -> ProcessingResult<FileOutcome> {
    let filename = input
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ProcessingError::InvalidInput {
            message: format!("input path has no usable filename: {}", input.display()),
        })?;

    let report_type = classify(filename)?;
    ctx.report_type = Some(report_type);
    if let Some(obs) = observer {
        obs.on_file_started(ctx);
    }

    let raw = ingest::read_table(input)?;
    let (cleaned, stats) = clean(&raw, report_type, config)?;
    // The raw table is no longer needed; let it go before building sheets.
    drop(raw);

    if let Some(obs) = observer {
        for (reason, count) in [
            (DropReason::MissingEmail, stats.dropped_missing_email),
            (DropReason::InternalAccount, stats.dropped_internal_account),
            (DropReason::Duplicate, stats.dropped_duplicates),
        ] {
            if count > 0 {
                obs.on_rows_dropped(ctx, reason, count);
            }
        }
    }

    let sheets = partition(&cleaned, config);

    let output_path = unique_output_path(output_dir, report_type.output_stem());
    write_workbook(&output_path, &sheets)?;

    let mut sheet_counts = Vec::with_capacity(sheets.len());
    for (name, table) in &sheets {
        if let Some(obs) = observer {
            obs.on_sheet_written(ctx, name, table.row_count());
        }
        sheet_counts.push((name.clone(), table.row_count()));
    }

    Ok(FileOutcome {
        report_type,
        stats,
        sheet_counts,
        output_path,
    })
}

/// Timestamped output name under `output_dir`, with a numeric suffix when the
/// timestamped name is already taken within the same second.
fn unique_output_path(output_dir: &Path, stem: &str) -> PathBuf {
    let ts = crate::observe::unix_ts();
    let mut path = output_dir.join(format!("{stem} {ts}.xlsx"));
    let mut attempt = 1u32;
    while path.exists() {
        path = output_dir.join(format!("{stem} {ts}-{attempt}.xlsx"));
        attempt += 1;
    }
    path
}
