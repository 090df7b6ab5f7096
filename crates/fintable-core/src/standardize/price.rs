use std::sync::LazyLock;

use regex::Regex;

use crate::classify::HEADER_LOOKAHEAD;
use crate::columns::{Column, ColumnMapping, PRICE_PRIORITY, PRICE_REQUIRED, map_columns};
use crate::date_parse::{INVALID_DATE, parse_date};
use crate::grid::{cell, is_blank_marker};
use crate::model::{Grid, StandardizedTable};
use crate::standardize::{EXTRAS_COLUMN, extras_json, extras_keys};

const OUTPUT_HEADER: [&str; 5] = ["date", "open", "high", "low", "close"];

static TIMEFRAME_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(mo|min|[mhdwy])$").expect("hardcoded timeframe regex is valid")
});

/// `daily` → `1D`, `5min` → `5m`, `3mo` → `3M`. A bare upper-case `M` is a
/// month, lower-case `m` a minute.
pub fn normalize_timeframe(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let word = match trimmed.to_ascii_lowercase().as_str() {
        "daily" => Some("1D"),
        "weekly" => Some("1W"),
        "monthly" => Some("1M"),
        "yearly" => Some("1Y"),
        _ => None,
    };
    if let Some(word) = word {
        return Some(word.to_string());
    }

    let caps = TIMEFRAME_UNIT.captures(trimmed)?;
    let count = caps.get(1)?.as_str();
    let unit = caps.get(2)?.as_str();
    let unit = if unit == "M" || unit.eq_ignore_ascii_case("mo") {
        "M".to_string()
    } else if unit == "m" || unit.eq_ignore_ascii_case("min") {
        "m".to_string()
    } else {
        unit.to_ascii_uppercase()
    };
    Some(format!("{count}{unit}"))
}

fn find_price_header(grid: &Grid) -> Option<(usize, ColumnMapping)> {
    grid.iter()
        .take(HEADER_LOOKAHEAD)
        .enumerate()
        .map(|(index, row)| (index, map_columns(row, PRICE_PRIORITY)))
        .find(|(_, mapping)| mapping.has_all(PRICE_REQUIRED))
}

fn detect_timeframe(grid: &Grid, header_index: usize) -> Option<String> {
    grid.iter()
        .take(header_index + 1)
        .flat_map(|row| row.iter())
        .find_map(|value| normalize_timeframe(value))
}

fn passthrough(grid: &Grid) -> StandardizedTable {
    StandardizedTable {
        grid: grid.clone(),
        ..StandardizedTable::default()
    }
}

/// Reshapes a price grid into `date, open, high, low, close[, extras]`.
///
/// The header row is searched among the first rows. When data rows are
/// wider than the header (a spanning cell hides a leading date column),
/// every mapped index shifts right by the difference and an unmatched date
/// falls back to column 0. Grids without a recognizable header pass through
/// untouched.
pub fn standardize_price(grid: &Grid) -> StandardizedTable {
    let Some((header_index, mapping)) = find_price_header(grid) else {
        tracing::debug!(rows = grid.len(), "no price header found; grid left as-is");
        return passthrough(grid);
    };

    let header = &grid[header_index];
    let data_rows = &grid[header_index + 1..];
    let data_width = data_rows.iter().map(Vec::len).max().unwrap_or(0);
    let column_offset = data_width.saturating_sub(header.len());
    let source = |column: Column| mapping.index_of(column).map(|index| index + column_offset);

    let (Some(open), Some(high), Some(low), Some(close)) = (
        source(Column::Open),
        source(Column::High),
        source(Column::Low),
        source(Column::Close),
    ) else {
        return passthrough(grid);
    };
    let date = source(Column::Date).unwrap_or(0);
    let targets = [date, open, high, low, close];

    let width = data_width.max(header.len());
    let extras_keys = extras_keys((0..width).filter(|index| !targets.contains(index)).map(
        |index| {
            let label = index
                .checked_sub(column_offset)
                .and_then(|header_index| header.get(header_index))
                .map(String::as_str);
            (index, label)
        },
    ));

    let mut out_header = OUTPUT_HEADER.map(str::to_string).to_vec();
    if !extras_keys.is_empty() {
        out_header.push(EXTRAS_COLUMN.to_string());
    }

    let mut out = vec![out_header];
    let mut dropped_rows = 0;
    let mut invalid_dates = 0;
    for row in data_rows {
        let raw_date = cell(row, date);
        if is_blank_marker(raw_date) {
            dropped_rows += 1;
            continue;
        }

        let parsed = parse_date(raw_date);
        if parsed == INVALID_DATE {
            invalid_dates += 1;
        }
        let mut record = vec![parsed];
        record.extend(targets[1..].iter().map(|&index| cell(row, index).to_string()));
        if !extras_keys.is_empty() {
            record.push(extras_json(&extras_keys, row));
        }
        out.push(record);
    }

    StandardizedTable {
        grid: out,
        timeframe: detect_timeframe(grid, header_index),
        dropped_rows,
        invalid_dates,
        standardized: true,
    }
}
