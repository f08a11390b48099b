//! Branch partitioning of cleaned tables.
//!
//! Every cleaned row lands in the consolidated base sheet; rows whose branch
//! name matches a configured library additionally land in that branch's sheet.
//! Partitioning is stable (input order preserved per bucket) and idempotent.

use crate::config::ProcessingConfig;
use crate::report::COL_LIBRARY;
use crate::types::Table;

/// Split a cleaned table into named output sheets.
///
/// Sheet order: base sheet first, then one sheet per configured branch in
/// configuration order, then (only when configured and non-trivial behavior is
/// wanted) the unmapped sheet. Rows matching no configured branch are never
/// dropped; they always remain visible in the base sheet.
///
/// A missing branch-name column degenerates gracefully: all rows go to the
/// base sheet and every branch sheet is empty.
pub fn partition(table: &Table, config: &ProcessingConfig) -> Vec<(String, Table)> {
    let library_idx = table.column_index(COL_LIBRARY);

    let mut sheets: Vec<(String, Table)> = Vec::with_capacity(config.branches.len() + 2);
    sheets.push((config.base_sheet.clone(), table.clone()));

    for branch in &config.branches {
        let rows = table.filter_rows(|row| match library_idx {
            Some(idx) => row[idx]
                .as_text()
                .map(|s| s.trim() == branch.library)
                .unwrap_or(false),
            None => false,
        });
        sheets.push((branch.sheet.clone(), rows));
    }

    if let Some(unmapped_name) = &config.unmapped_sheet {
        let rows = table.filter_rows(|row| match library_idx {
            Some(idx) => {
                let library = row[idx].as_text().map(str::trim).unwrap_or("");
                config.sheet_for_library(library).is_none()
            }
            None => true,
        });
        sheets.push((unmapped_name.clone(), rows));
    }

    sheets
}

#[cfg(test)]
mod tests {
    use super::partition;
    use crate::config::ProcessingConfig;
    use crate::types::{Cell, Table};

    fn cleaned_table() -> Table {
        let row = |name: &str, library: &str| {
            vec![
                Cell::Text(name.into()),
                Cell::Text(format!("{}@ex.org", name.to_lowercase())),
                Cell::Text(library.into()),
            ]
        };
        Table::new(
            vec![
                "Nome da pessoa".into(),
                "Email".into(),
                "Nome da biblioteca".into(),
            ],
            vec![
                row("Ana", "Biblioteca Campus I - Unid. 1"),
                row("Bruno", "Biblioteca Campus II"),
                row("Carla", "Biblioteca Campus I - Unid. 1"),
                row("Davi", "Acervo Itinerante"),
            ],
        )
    }

    #[test]
    fn base_sheet_contains_every_row() {
        let cfg = ProcessingConfig::default();
        let sheets = partition(&cleaned_table(), &cfg);
        assert_eq!(sheets[0].0, "Base");
        assert_eq!(sheets[0].1.row_count(), 4);
    }

    #[test]
    fn branch_sheets_follow_config_order() {
        let cfg = ProcessingConfig::default();
        let sheets = partition(&cleaned_table(), &cfg);
        let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Base", "Unidade 1", "Unidade 2", "Campus II"]);
        assert_eq!(sheets[1].1.row_count(), 2);
        assert_eq!(sheets[2].1.row_count(), 0);
        assert_eq!(sheets[3].1.row_count(), 1);
    }

    #[test]
    fn branch_rows_are_contained_in_base() {
        let cfg = ProcessingConfig::default();
        let sheets = partition(&cleaned_table(), &cfg);
        let (_, base) = &sheets[0];
        for (_, sheet) in &sheets[1..] {
            for row in &sheet.rows {
                assert!(base.rows.contains(row));
            }
        }
    }

    #[test]
    fn unmapped_rows_stay_in_base_by_default() {
        let cfg = ProcessingConfig::default();
        let sheets = partition(&cleaned_table(), &cfg);
        assert_eq!(sheets.len(), 4);
        let branch_total: usize = sheets[1..].iter().map(|(_, t)| t.row_count()).sum();
        // Davi's itinerant row is only in Base.
        assert_eq!(branch_total, 3);
    }

    #[test]
    fn unmapped_sheet_collects_leftovers_when_configured() {
        let cfg = ProcessingConfig {
            unmapped_sheet: Some("Não mapeadas".to_string()),
            ..ProcessingConfig::default()
        };
        let sheets = partition(&cleaned_table(), &cfg);
        let (name, unmapped) = sheets.last().unwrap();
        assert_eq!(name, "Não mapeadas");
        assert_eq!(unmapped.row_count(), 1);
        assert_eq!(unmapped.rows[0][0], Cell::Text("Davi".into()));
        // Still present in Base as well.
        assert!(sheets[0].1.rows.contains(&unmapped.rows[0]));
    }

    #[test]
    fn partition_is_idempotent() {
        let cfg = ProcessingConfig::default();
        let table = cleaned_table();
        assert_eq!(partition(&table, &cfg), partition(&table, &cfg));
    }
}
