use crate::columns::{Column, DIVIDEND_PRIORITY, map_columns};
use crate::date_parse::{INVALID_DATE, parse_date};
use crate::grid::{cell, is_blank_marker};
use crate::model::{Grid, Row, StandardizedTable};
use crate::standardize::{EXTRAS_COLUMN, extras_json, extras_keys};

const OPTIONAL_COLUMNS: [Column; 4] = [
    Column::Indicator,
    Column::AnnouncementDate,
    Column::PaymentDate,
    Column::Description,
];

fn is_date_column(column: Column) -> bool {
    matches!(
        column,
        Column::ExDate | Column::AnnouncementDate | Column::PaymentDate
    )
}

/// Columns with at least one data cell that is neither blank nor a "view"
/// action link.
fn data_bearing_columns(grid: &Grid) -> Vec<usize> {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .filter(|&index| {
            grid.iter().skip(1).any(|row| {
                let value = cell(row, index).trim();
                !value.is_empty() && !value.eq_ignore_ascii_case("view")
            })
        })
        .collect()
}

fn project(row: &[String], keep: &[usize]) -> Row {
    keep.iter()
        .map(|&index| cell(row, index).to_string())
        .collect()
}

/// Reshapes a dividend grid into `ex_date, amount[, indicator]
/// [, announcement_date][, payment_date][, description][, extras]`.
/// Rows without an amount are dropped.
pub fn standardize_dividend(grid: &Grid) -> StandardizedTable {
    let keep = data_bearing_columns(grid);
    let filtered = grid
        .iter()
        .map(|row| project(row, &keep))
        .collect::<Vec<_>>();
    let header = filtered.first().cloned().unwrap_or_default();
    let mapping = map_columns(&header, DIVIDEND_PRIORITY);

    let mut columns = vec![Column::ExDate, Column::Amount];
    columns.extend(
        OPTIONAL_COLUMNS
            .iter()
            .copied()
            .filter(|column| mapping.index_of(*column).is_some()),
    );

    let extras_keys = extras_keys(
        mapping
            .extras()
            .iter()
            .map(|&index| (index, header.get(index).map(String::as_str))),
    );

    let mut out_header = columns
        .iter()
        .map(|column| column.as_str().to_string())
        .collect::<Vec<_>>();
    if !extras_keys.is_empty() {
        out_header.push(EXTRAS_COLUMN.to_string());
    }

    let mut out = vec![out_header];
    let mut dropped_rows = 0;
    let mut invalid_dates = 0;
    let amount_index = mapping.index_of(Column::Amount);

    for row in filtered.iter().skip(1) {
        let amount = amount_index.map_or("", |index| cell(row, index));
        if is_blank_marker(amount) {
            dropped_rows += 1;
            continue;
        }

        let mut record = Vec::with_capacity(columns.len() + 1);
        for &column in &columns {
            let raw = mapping.index_of(column).map_or("", |index| cell(row, index));
            if is_date_column(column) {
                let parsed = parse_date(raw);
                if parsed == INVALID_DATE {
                    invalid_dates += 1;
                }
                record.push(parsed);
            } else {
                record.push(raw.to_string());
            }
        }
        if !extras_keys.is_empty() {
            record.push(extras_json(&extras_keys, row));
        }
        out.push(record);
    }

    if dropped_rows > 0 {
        tracing::debug!(dropped_rows, "dividend rows without an amount were dropped");
    }

    StandardizedTable {
        grid: out,
        timeframe: None,
        dropped_rows,
        invalid_dates,
        standardized: true,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::standardize_dividend;
    use crate::date_parse::INVALID_DATE;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    #[test]
    fn keeps_only_rows_with_an_amount() {
        let input = grid(&[
            &["Ex-Date", "Amount"],
            &["2024-03-01", "1.50"],
            &["2024-06-01", "-"],
            &["2024-09-01", ""],
        ]);
        let table = standardize_dividend(&input);
        assert_eq!(
            table.grid,
            grid(&[&["ex_date", "amount"], &["2024-03-01", "1.50"]])
        );
        assert_eq!(table.dropped_rows, 2);
    }

    #[test]
    fn orders_optional_columns_and_parses_dates() {
        let input = grid(&[
            &["Description", "Payment Date", "Amount", "Ex Dividend Date", "Declared"],
            &["Final", "Apr 12, 2024", "0.32", "15/03/2024", "Feb 30, 2024"],
        ]);
        let table = standardize_dividend(&input);
        assert_eq!(
            table.grid,
            grid(&[
                &[
                    "ex_date",
                    "amount",
                    "announcement_date",
                    "payment_date",
                    "description"
                ],
                &["2024-03-15", "0.32", INVALID_DATE, "2024-04-12", "Final"],
            ])
        );
        assert_eq!(table.invalid_dates, 1);
    }

    #[test]
    fn serializes_unmatched_columns_as_extras() {
        let input = grid(&[
            &["Ex-Date", "Amount", "Financial Year"],
            &["2024-03-01", "1.00", "2024"],
            &["2023-03-01", "0.90", ""],
        ]);
        let table = standardize_dividend(&input);
        assert_eq!(table.grid[0], vec!["ex_date", "amount", "extras"]);
        assert_eq!(table.grid[1][2], r#"{"financial_year":"2024"}"#);
        assert_eq!(table.grid[2][2], "{}");
    }

    #[test]
    fn keeps_every_value_when_extras_labels_collide() {
        let input = grid(&[
            &["Ex-Date", "Amount", "Yield %", "Yield"],
            &["2024-03-01", "1.00", "3.1", "3.2"],
        ]);
        let table = standardize_dividend(&input);
        assert_eq!(table.grid[1][2], r#"{"yield":"3.1","yield_2":"3.2"}"#);
    }

    #[test]
    fn drops_view_link_and_empty_columns() {
        let input = grid(&[
            &["Ex-Date", "Details", "Amount", "Spacer"],
            &["2024-03-01", "View", "1.00", ""],
            &["2023-03-01", "view", "0.90"],
        ]);
        let table = standardize_dividend(&input);
        assert_eq!(
            table.grid,
            grid(&[
                &["ex_date", "amount"],
                &["2024-03-01", "1.00"],
                &["2023-03-01", "0.90"],
            ])
        );
    }

    #[test]
    fn header_only_grid_yields_header_only() {
        let table = standardize_dividend(&grid(&[&["Ex-Date", "Amount"]]));
        assert_eq!(table.grid, grid(&[&["ex_date", "amount"]]));
    }
}
