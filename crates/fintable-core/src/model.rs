use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One row of cell text, left to right.
pub type Row = Vec<String>;

/// Rows of cell text, top to bottom. Rows may be shorter than the header.
pub type Grid = Vec<Row>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Price,
    Dividend,
    Unclassified,
}

impl TableType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Dividend => "dividend",
            Self::Unclassified => "unclassified",
        }
    }
}

impl Display for TableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a standardizer: the canonical grid (header at row 0) plus
/// what was lost on the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StandardizedTable {
    pub grid: Grid,
    pub timeframe: Option<String>,
    pub dropped_rows: usize,
    pub invalid_dates: usize,
    /// False when the grid passed through untouched.
    pub standardized: bool,
}

impl StandardizedTable {
    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.grid.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedTable {
    pub index: usize,
    pub table_type: TableType,
    pub timeframe: Option<String>,
    pub row_count: usize,
    pub csv: String,
}
