use crate::model::{Grid, Row};

/// A table as the host page exposes it: raw cell text, no normalization.
pub trait TableElement {
    /// Rows inside the table's header region (`thead`), top to bottom.
    /// Empty when the table has no header region.
    fn head_rows(&self) -> Vec<Row>;

    /// Every row of the table in document order, header rows included.
    fn rows(&self) -> Vec<Row>;
}

/// Owned snapshot of a table, handy for synthetic tables and tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableLayout {
    pub head: Vec<Row>,
    pub rows: Vec<Row>,
}

impl TableLayout {
    /// A table without a header region.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            head: Vec::new(),
            rows,
        }
    }

    /// A table whose first `head_len` rows sit in the header region.
    #[must_use]
    pub fn with_head(rows: Vec<Row>, head_len: usize) -> Self {
        let head = rows.iter().take(head_len).cloned().collect();
        Self { head, rows }
    }
}

impl TableElement for TableLayout {
    fn head_rows(&self) -> Vec<Row> {
        self.head.clone()
    }

    fn rows(&self) -> Vec<Row> {
        self.rows.clone()
    }
}

/// Unicode minus becomes `-` and middle dot becomes a space so spreadsheets
/// re-import the values as numbers.
pub fn normalize_cell(raw: &str) -> String {
    raw.replace('\u{2212}', "-")
        .replace('\u{00B7}', " ")
        .trim()
        .to_string()
}

pub(crate) fn normalize_row(row: &[String]) -> Row {
    row.iter().map(|cell| normalize_cell(cell)).collect()
}

pub fn extract_grid<T>(table: &T) -> Grid
where
    T: TableElement + ?Sized,
{
    table.rows().iter().map(|row| normalize_row(row)).collect()
}

/// Cell text at `index`, or `""` when the row is short.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

pub(crate) fn is_blank_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "-"
}
