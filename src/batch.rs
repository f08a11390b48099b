//! Folder-based batch processing.
//!
//! Discovers export files in the input folder, runs each through the pipeline,
//! and moves the input to the processed or errors folder depending on the
//! outcome. One file's failure never aborts the rest of the batch.

use std::path::{Path, PathBuf};

use glob::glob;

use crate::config::{FolderLayout, ProcessingConfig};
use crate::error::{ProcessingError, ProcessingResult};
use crate::observe::ProcessObserver;
use crate::pipeline::{process_file, FileOutcome};

const INPUT_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods", "csv"];

/// Outcome of one folder pass.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files processed successfully, with their outcomes.
    pub succeeded: Vec<(PathBuf, FileOutcome)>,
    /// Files that failed, with the error that stopped them.
    pub failed: Vec<(PathBuf, ProcessingError)>,
    /// Files whose workbook was handled but which could not be moved out of
    /// the input folder. They will be picked up again on the next pass.
    pub move_failures: Vec<(PathBuf, std::io::Error)>,
}

impl BatchSummary {
    /// True when every discovered file was processed and moved successfully.
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty() && self.move_failures.is_empty()
    }

    /// Total number of files considered in this pass.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Moves an input file out of the input folder after processing.
///
/// The batch loop treats moving as a collaborator so callers can substitute
/// their own policy; [`FsMover`] is the default.
pub trait FileMover {
    /// Move `src` into `dest_dir`, returning the final destination path.
    fn move_to(&self, src: &Path, dest_dir: &Path) -> std::io::Result<PathBuf>;
}

/// Filesystem mover: rename with a copy-and-remove fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FileMover for FsMover {
    fn move_to(&self, src: &Path, dest_dir: &Path) -> std::io::Result<PathBuf> {
        move_file(src, dest_dir)
    }
}

/// Find export files waiting in the input folder, in deterministic order.
///
/// Only files with a supported extension are returned; anything else in the
/// folder is left untouched.
pub fn discover_inputs(layout: &FolderLayout) -> ProcessingResult<Vec<PathBuf>> {
    let mut inputs: Vec<PathBuf> = Vec::new();
    for ext in INPUT_EXTENSIONS {
        let pattern = format!("{}/*.{ext}", layout.input.display());
        let paths = glob(&pattern).map_err(|e| ProcessingError::InvalidInput {
            message: format!("bad glob pattern '{pattern}': {e}"),
        })?;
        for entry in paths.flatten() {
            if entry.is_file() {
                inputs.push(entry);
            }
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Process every discovered input file once.
///
/// Creates the folder layout if missing. Successful inputs move to the
/// processed folder, failed ones to the errors folder; processing continues
/// past failures — including move failures, which land in
/// [`BatchSummary::move_failures`] — and the summary reports every side.
pub fn run_once(
    config: &ProcessingConfig,
    layout: &FolderLayout,
    observer: Option<&dyn ProcessObserver>,
) -> ProcessingResult<BatchSummary> {
    run_once_with(config, layout, observer, &FsMover)
}

/// [`run_once`] with an explicit [`FileMover`].
pub fn run_once_with(
    config: &ProcessingConfig,
    layout: &FolderLayout,
    observer: Option<&dyn ProcessObserver>,
    mover: &dyn FileMover,
) -> ProcessingResult<BatchSummary> {
    layout.ensure()?;

    let mut summary = BatchSummary::default();
    for input in discover_inputs(layout)? {
        match process_file(&input, &layout.output, config, observer) {
            Ok(outcome) => {
                if let Err(e) = mover.move_to(&input, &layout.processed) {
                    summary.move_failures.push((input.clone(), e));
                }
                summary.succeeded.push((input, outcome));
            }
            Err(error) => {
                if let Err(e) = mover.move_to(&input, &layout.errors) {
                    summary.move_failures.push((input.clone(), e));
                }
                summary.failed.push((input, error));
            }
        }
    }
    Ok(summary)
}

/// Move `src` into `dest_dir`, renaming on filename collision.
///
/// Falls back to copy-and-remove when a plain rename fails (e.g. the folders
/// live on different filesystems).
pub fn move_file(src: &Path, dest_dir: &Path) -> std::io::Result<PathBuf> {
    let file_name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());

    let mut dest = dest_dir.join(&file_name);
    if dest.exists() {
        dest = dest_dir.join(format!("{}_{file_name}", crate::observe::unix_ts()));
    }

    if std::fs::rename(src, &dest).is_err() {
        std::fs::copy(src, &dest)?;
        std::fs::remove_file(src)?;
    }
    Ok(dest)
}
