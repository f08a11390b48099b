//! Report types and their column schemas.
//!
//! The two export flavors are sibling variants of a closed enum rather than ad
//! hoc string checks: classification happens exactly once per input file, and
//! every schema decision downstream dispatches on [`ReportType`].

use crate::error::{ProcessingError, ProcessingResult};

/// Column holding the borrower's name.
pub const COL_PERSON_NAME: &str = "Nome da pessoa";
/// Column holding the borrower's email address(es).
pub const COL_EMAIL: &str = "Email";
/// Column holding the branch/library name used for partitioning.
pub const COL_LIBRARY: &str = "Nome da biblioteca";
/// Loan-only gender column (used to pick salutation suffixes).
pub const COL_GENDER: &str = "Gênero";
/// Loan-only column identifying who registered the loan; dropped after
/// filtering out the system account.
pub const COL_LOAN_OPERATOR: &str = "Nome pessoa empréstimo";
/// Pending-only title column.
pub const COL_TITLE: &str = "Título";
/// Pending-only loan date column (pass-through).
pub const COL_LOAN_DATE: &str = "Data de empréstimo";
/// Pending-only due date column (pass-through).
pub const COL_DUE_DATE: &str = "Data devolução prevista";

/// System account whose loan rows are noise in every report.
pub const INTERNAL_LOAN_ACCOUNT: &str = "Bibinternet";

const LOAN_KEYWORDS: &[&str] = &["emprestimo", "empréstimo", "loan"];
const PENDING_KEYWORDS: &[&str] = &["pendencia", "pendência", "pending"];

/// The two report flavors exported by the library system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    /// Active book loans per person/branch.
    Loan,
    /// Overdue/outstanding items per person/branch.
    Pending,
}

impl ReportType {
    /// Columns that must be present in the input header. A missing column is
    /// fatal for the whole file ([`ProcessingError::MissingColumns`]).
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            ReportType::Loan => &[
                COL_PERSON_NAME,
                COL_GENDER,
                COL_LIBRARY,
                COL_EMAIL,
                COL_LOAN_OPERATOR,
            ],
            ReportType::Pending => &[
                COL_PERSON_NAME,
                COL_EMAIL,
                COL_LOAN_DATE,
                COL_DUE_DATE,
                COL_TITLE,
                COL_LIBRARY,
            ],
        }
    }

    /// Columns of the cleaned output, in final order.
    ///
    /// Loans drop the operator helper column; pending reports move the title
    /// ahead of the date columns.
    pub fn output_columns(&self) -> &'static [&'static str] {
        match self {
            ReportType::Loan => &[COL_PERSON_NAME, COL_GENDER, COL_LIBRARY, COL_EMAIL],
            ReportType::Pending => &[
                COL_PERSON_NAME,
                COL_EMAIL,
                COL_TITLE,
                COL_LOAN_DATE,
                COL_DUE_DATE,
                COL_LIBRARY,
            ],
        }
    }

    /// Stem used when naming the output workbook.
    pub fn output_stem(&self) -> &'static str {
        match self {
            ReportType::Loan => "Relatório de Empréstimos",
            ReportType::Pending => "Relatório de Pendência",
        }
    }

    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Loan => "loan",
            ReportType::Pending => "pending",
        }
    }
}

/// Classify an input file from its name, case-insensitively.
///
/// A filename matching neither keyword set, or matching both, is rejected with
/// [`ProcessingError::UnclassifiableFile`]: a file is never processed under a
/// guessed default type.
pub fn classify(filename: &str) -> ProcessingResult<ReportType> {
    let lower = filename.to_lowercase();
    let is_loan = LOAN_KEYWORDS.iter().any(|kw| lower.contains(kw));
    let is_pending = PENDING_KEYWORDS.iter().any(|kw| lower.contains(kw));

    match (is_loan, is_pending) {
        (true, false) => Ok(ReportType::Loan),
        (false, true) => Ok(ReportType::Pending),
        _ => Err(ProcessingError::UnclassifiableFile {
            filename: filename.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, ReportType};
    use crate::error::ProcessingError;

    #[test]
    fn classify_loan_filenames() {
        assert_eq!(
            classify("Relatorio_emprestimo_30.06.2025.xlsx").unwrap(),
            ReportType::Loan
        );
        assert_eq!(
            classify("Relatório de Empréstimos 30.06.2025.xlsx").unwrap(),
            ReportType::Loan
        );
        assert_eq!(classify("monthly_LOANS.csv").unwrap(), ReportType::Loan);
    }

    #[test]
    fn classify_pending_filenames() {
        assert_eq!(
            classify("pendencia_unidade1.xls").unwrap(),
            ReportType::Pending
        );
        assert_eq!(
            classify("Pendências_2025.xlsx").unwrap(),
            ReportType::Pending
        );
        assert_eq!(classify("pending-items.csv").unwrap(), ReportType::Pending);
    }

    #[test]
    fn classify_rejects_unknown_names() {
        let err = classify("relatorio_geral.xlsx").unwrap_err();
        assert!(matches!(err, ProcessingError::UnclassifiableFile { .. }));
    }

    #[test]
    fn classify_rejects_ambiguous_names() {
        // Matching both keyword sets must not silently pick one.
        let err = classify("emprestimo_e_pendencia.xlsx").unwrap_err();
        assert!(matches!(err, ProcessingError::UnclassifiableFile { .. }));
    }
}
