//! Row validation and cleaning.
//!
//! [`clean`] turns a raw ingested [`Table`] into the cleaned table handed to
//! the partitioner. Rules are applied in a fixed order; row-level failures
//! (no usable email) drop the row and are counted, file-level failures
//! (missing columns) abort the whole file with zero rows produced.

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult};
use crate::report::{
    ReportType, COL_EMAIL, COL_GENDER, COL_LOAN_OPERATOR, COL_PERSON_NAME, INTERNAL_LOAN_ACCOUNT,
};
use crate::types::{Cell, Table};

/// Per-file counts of what the cleaner did, for diagnostics and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Rows in the raw input table.
    pub rows_in: usize,
    /// Rows dropped for an empty/sentinel email value.
    pub dropped_missing_email: usize,
    /// Rows dropped because they belong to the internal system account.
    pub dropped_internal_account: usize,
    /// Exact duplicate rows removed.
    pub dropped_duplicates: usize,
    /// Rows in the cleaned output table.
    pub rows_out: usize,
}

/// Clean a raw table according to its report type.
///
/// Fails with [`ProcessingError::MissingColumns`] before touching any row if
/// the header lacks a required column. Otherwise applies, in order: column
/// projection, email presence filtering, loan-operator noise filtering (loans
/// only), duplicate removal, name sort, name truncation to the first token,
/// gender code mapping (loans only), and email separator normalization.
/// Pending-report date and title columns pass through unchanged.
pub fn clean(
    table: &Table,
    report_type: ReportType,
    config: &ProcessingConfig,
) -> ProcessingResult<(Table, CleanStats)> {
    let missing = table.missing_columns(report_type.required_columns());
    if !missing.is_empty() {
        return Err(ProcessingError::MissingColumns {
            missing,
            available: table.columns.clone(),
        });
    }

    let mut stats = CleanStats {
        rows_in: table.row_count(),
        ..CleanStats::default()
    };

    let mut table = table.select_columns(report_type.required_columns());

    if config.validate_emails {
        let email_idx = table
            .column_index(COL_EMAIL)
            .expect("required columns were checked");
        let before = table.row_count();
        table = table.filter_rows(|row| !row[email_idx].is_blank());
        stats.dropped_missing_email = before - table.row_count();
    }

    if report_type == ReportType::Loan {
        let op_idx = table
            .column_index(COL_LOAN_OPERATOR)
            .expect("required columns were checked");
        let before = table.row_count();
        table = table.filter_rows(|row| {
            row[op_idx]
                .as_text()
                .map(|s| s.trim() != INTERNAL_LOAN_ACCOUNT)
                .unwrap_or(true)
        });
        stats.dropped_internal_account = before - table.row_count();
    }

    // Projects loans down to their output columns (dropping the operator
    // helper) and reorders pending columns into presentation order.
    let mut table = table.select_columns(report_type.output_columns());

    if config.remove_duplicates {
        stats.dropped_duplicates = table.dedup_rows();
    }

    if config.sort_by_name {
        table.sort_by_column(COL_PERSON_NAME);
    }

    if config.format_names {
        if let Some(name_idx) = table.column_index(COL_PERSON_NAME) {
            table = table.map_rows(|row| {
                let mut out = row.to_vec();
                if let Some(name) = out[name_idx].as_text() {
                    out[name_idx] = Cell::Text(first_name(name));
                }
                out
            });
        }
    }

    if report_type == ReportType::Loan {
        if let Some(gender_idx) = table.column_index(COL_GENDER) {
            table = table.map_rows(|row| {
                let mut out = row.to_vec();
                if let Some(code) = out[gender_idx].as_text() {
                    let code = code.trim();
                    if let Some((_, repl)) =
                        config.gender_map.iter().find(|(from, _)| from.as_str() == code)
                    {
                        out[gender_idx] = Cell::Text(repl.clone());
                    }
                }
                out
            });
        }
    }

    if let Some(email_idx) = table.column_index(COL_EMAIL) {
        // Multi-address cells come in comma-separated; mail merge wants "; ".
        table = table.map_rows(|row| {
            let mut out = row.to_vec();
            if let Some(email) = out[email_idx].as_text() {
                if email.contains(',') {
                    out[email_idx] = Cell::Text(email.replace(',', "; "));
                }
            }
            out
        });
    }

    stats.rows_out = table.row_count();
    Ok((table, stats))
}

/// First whitespace-delimited token of a name, title-cased.
///
/// An empty or whitespace-only value yields an empty string; it never causes a
/// row drop.
fn first_name(full: &str) -> String {
    match full.split_whitespace().next() {
        Some(token) => title_case(token),
        None => String::new(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
