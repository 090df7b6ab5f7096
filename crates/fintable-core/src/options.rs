use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::TableType;

/// Which standardizer to run. `Auto` trusts the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableKindSelection {
    #[default]
    Auto,
    Price,
    Dividend,
}

impl TableKindSelection {
    /// The type to standardize as, given what the classifier decided.
    #[must_use]
    pub fn resolve(self, classified: TableType) -> TableType {
        match self {
            Self::Auto => classified,
            Self::Price => TableType::Price,
            Self::Dividend => TableType::Dividend,
        }
    }
}

impl FromStr for TableKindSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "price" => Ok(Self::Price),
            "dividend" | "dividends" => Ok(Self::Dividend),
            other => Err(format!(
                "unknown table kind '{other}', expected auto, price or dividend"
            )),
        }
    }
}

impl Display for TableKindSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Price => "price",
            Self::Dividend => "dividend",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub kind: TableKindSelection,
    pub csv: CsvOptions,
    /// Export only the table at this position among classified tables.
    pub table: Option<usize>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::TableKindSelection;
    use crate::model::TableType;

    #[test]
    fn parses_kind_selection() {
        assert_eq!(
            TableKindSelection::from_str(" Price ").expect("kind should parse"),
            TableKindSelection::Price
        );
        assert_eq!(
            TableKindSelection::from_str("dividends").expect("kind should parse"),
            TableKindSelection::Dividend
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = TableKindSelection::from_str("ohlc").expect_err("unknown kind should fail");
        assert!(err.contains("unknown table kind"));
    }

    #[test]
    fn forced_kind_overrides_classifier() {
        assert_eq!(
            TableKindSelection::Dividend.resolve(TableType::Unclassified),
            TableType::Dividend
        );
        assert_eq!(
            TableKindSelection::Auto.resolve(TableType::Price),
            TableType::Price
        );
    }
}
