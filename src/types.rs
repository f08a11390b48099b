//! Core data model types for report processing.
//!
//! Input files are ingested into an in-memory [`Table`]: an ordered header plus
//! row-major [`Cell`] storage. The cleaning and partitioning layers operate on
//! tables and never touch the filesystem.

use std::fmt;

/// A single cell in a [`Table`].
///
/// Spreadsheet exports are not strictly typed, so cells carry whatever the
/// source file had. Date cells keep the Excel serial value and are written back
/// out unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing/empty value.
    Null,
    /// UTF-8 text.
    Text(String),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Excel serial datetime (days since 1900 epoch, fractional time).
    DateTime(f64),
}

impl Cell {
    /// The cell's text content, if it is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Display text used for sorting and duplicate detection.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(f) => f.to_string(),
        }
    }

    /// True when the cell carries no usable content: `Null`, empty or
    /// whitespace-only text, or a textual missing-value sentinel ("nan",
    /// "null", "none", case-insensitive) as emitted by some export tools.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => {
                let t = s.trim();
                t.is_empty()
                    || t.eq_ignore_ascii_case("nan")
                    || t.eq_ignore_ascii_case("null")
                    || t.eq_ignore_ascii_case("none")
            }
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// In-memory tabular snapshot of one input file (or one output sheet).
///
/// Rows are stored as `Vec<Vec<Cell>>` in the same order as `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered column names from the header row.
    pub columns: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from a header and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the subset of `required` that is absent from the header.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| (*name).to_string())
            .collect()
    }

    /// Project the table down to `names`, in that order.
    ///
    /// Every requested column must exist; callers are expected to run
    /// [`Table::missing_columns`] first.
    ///
    /// # Panics
    ///
    /// Panics if a requested column is not present.
    pub fn select_columns(&self, names: &[&str]) -> Self {
        let idxs: Vec<usize> = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .unwrap_or_else(|| panic!("select_columns: column '{name}' not present"))
            })
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Self {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        }
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original header and relative row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Create a new table by applying `mapper` to every row.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the
    /// header.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Cell]) -> Vec<Cell>,
    {
        let expected_len = self.columns.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match header length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Remove exact duplicate rows, keeping the first occurrence.
    ///
    /// Returns the number of rows removed. Stable: surviving rows keep their
    /// relative order.
    pub fn dedup_rows(&mut self) -> usize {
        use std::collections::HashSet;

        let before = self.rows.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row_fingerprint(row)));
        before - self.rows.len()
    }

    /// Stable sort of rows by the display text of `column`.
    ///
    /// No-op when the column is absent.
    pub fn sort_by_column(&mut self, column: &str) {
        if let Some(idx) = self.column_index(column) {
            self.rows
                .sort_by(|a, b| a[idx].display_text().cmp(&b[idx].display_text()));
        }
    }
}

// Unit-separator-joined cells, each tagged with its variant so that e.g.
// Text("1") and Int(1) key differently. Good enough as an equality key
// because spreadsheet cell text never contains control characters.
fn row_fingerprint(row: &[Cell]) -> String {
    let mut key = String::new();
    for cell in row {
        key.push(match cell {
            Cell::Null => 'n',
            Cell::Text(_) => 't',
            Cell::Int(_) => 'i',
            Cell::Float(_) => 'f',
            Cell::Bool(_) => 'b',
            Cell::DateTime(_) => 'd',
        });
        key.push_str(&cell.display_text());
        key.push('\u{1f}');
    }
    key
}
