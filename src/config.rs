//! Process-wide configuration.
//!
//! Everything tunable lives in one explicit [`ProcessingConfig`] value that is
//! built once at startup (defaults, or a JSON file) and passed by reference
//! into each component. Branch additions are data changes, not code changes.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ProcessingResult;

/// One output branch sheet and the exact library name that feeds it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    /// Output sheet name (e.g. "Unidade 1").
    pub sheet: String,
    /// Exact value of the branch-name column that maps to this sheet.
    pub library: String,
}

/// Configuration for cleaning and partitioning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Ordered branch table; per-branch sheets are emitted in this order.
    pub branches: Vec<Branch>,
    /// Name of the consolidated sheet holding every cleaned row.
    pub base_sheet: String,
    /// When set, rows whose branch name maps to no configured branch are also
    /// emitted to a dedicated sheet with this name (they always stay in the
    /// base sheet either way).
    pub unmapped_sheet: Option<String>,
    /// Drop exact duplicate rows.
    pub remove_duplicates: bool,
    /// Sort cleaned rows by person name.
    pub sort_by_name: bool,
    /// Title-case names and keep only the first name token.
    pub format_names: bool,
    /// Drop rows without a usable email value.
    pub validate_emails: bool,
    /// Gender code replacements for loan reports (code, replacement).
    pub gender_map: Vec<(String, String)>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            branches: vec![
                Branch {
                    sheet: "Unidade 1".to_string(),
                    library: "Biblioteca Campus I - Unid. 1".to_string(),
                },
                Branch {
                    sheet: "Unidade 2".to_string(),
                    library: "Biblioteca Campus I - Unid. 2".to_string(),
                },
                Branch {
                    sheet: "Campus II".to_string(),
                    library: "Biblioteca Campus II".to_string(),
                },
            ],
            base_sheet: "Base".to_string(),
            unmapped_sheet: None,
            remove_duplicates: true,
            sort_by_name: true,
            format_names: true,
            validate_emails: true,
            gender_map: vec![
                ("M".to_string(), "o".to_string()),
                ("F".to_string(), "a".to_string()),
            ],
        }
    }
}

impl ProcessingConfig {
    /// Load configuration from a JSON file. Absent keys fall back to defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> ProcessingResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg = serde_json::from_str(&data)
            .map_err(|e| crate::error::ProcessingError::InvalidInput {
                message: format!("config parse error: {e}"),
            })?;
        Ok(cfg)
    }

    /// Returns the sheet name for an exact library name, if configured.
    pub fn sheet_for_library(&self, library: &str) -> Option<&str> {
        self.branches
            .iter()
            .find(|b| b.library == library)
            .map(|b| b.sheet.as_str())
    }
}

/// Folder layout used by batch processing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FolderLayout {
    /// Where new exports are dropped.
    pub input: PathBuf,
    /// Where cleaned workbooks are written.
    pub output: PathBuf,
    /// Where successfully processed inputs are moved.
    pub processed: PathBuf,
    /// Where failed inputs are moved.
    pub errors: PathBuf,
}

impl Default for FolderLayout {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Entrada"),
            output: PathBuf::from("Saida"),
            processed: PathBuf::from("Entrada/Processados"),
            errors: PathBuf::from("Entrada/Erros"),
        }
    }
}

impl FolderLayout {
    /// Create every folder in the layout if missing.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.input, &self.output, &self.processed, &self.errors] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
