mod dividend;
mod price;

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::grid::cell;
use crate::model::{Grid, StandardizedTable, TableType};

pub use dividend::standardize_dividend;
pub use price::{normalize_timeframe, standardize_price};

pub const EXTRAS_COLUMN: &str = "extras";

/// `"Financial Year"` becomes `financial_year`.
pub fn snake_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_separator = false;
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Key for an unmatched column: the snake-cased label, or `col_N`
/// (1-based source position) when the label is missing or has no word
/// characters.
fn extras_key(label: Option<&str>, source_index: usize) -> String {
    label
        .map(snake_case)
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| format!("col_{}", source_index + 1))
}

/// Keys for every unmatched column of one table, in column order. A key an
/// earlier column already took gets a `_2`, `_3`, ... suffix.
pub(crate) fn extras_keys<'a, I>(columns: I) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = (usize, Option<&'a str>)>,
{
    let mut taken = HashSet::new();
    columns
        .into_iter()
        .map(|(index, label)| {
            let base = extras_key(label, index);
            let mut key = base.clone();
            let mut suffix = 2;
            while !taken.insert(key.clone()) {
                key = format!("{base}_{suffix}");
                suffix += 1;
            }
            (index, key)
        })
        .collect()
}

/// Serializes one row's unmatched columns as a JSON object. Blank values are
/// left out entirely.
pub(crate) fn extras_json(keys: &[(usize, String)], row: &[String]) -> String {
    let mut object = Map::new();
    for (index, key) in keys {
        let value = cell(row, *index).trim();
        if value.is_empty() {
            continue;
        }
        object.insert(key.clone(), Value::String(value.to_string()));
    }
    Value::Object(object).to_string()
}

pub fn standardize(grid: &Grid, table_type: TableType) -> Result<StandardizedTable, ExtractError> {
    match table_type {
        TableType::Price => Ok(standardize_price(grid)),
        TableType::Dividend => Ok(standardize_dividend(grid)),
        TableType::Unclassified => Err(ExtractError::UnsupportedTableType(table_type)),
    }
}
