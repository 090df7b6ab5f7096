mod classify;
mod columns;
mod csv_out;
mod date_parse;
mod error;
mod grid;
mod html;
mod model;
mod options;
mod standardize;
mod tokenize;
mod warning;

pub use classify::{HEADER_LOOKAHEAD, classify_rows, classify_table, is_price_header};
pub use columns::{
    Column, ColumnMapping, DIVIDEND_PRIORITY, DIVIDEND_REQUIRED, Matcher, PRICE_PRIORITY,
    PRICE_REQUIRED, map_columns,
};
pub use csv_out::write_csv_to_string;
pub use date_parse::{
    DateFormat, INVALID_DATE, ParsedDate, expand_two_digit_year, parse_date, parse_date_detailed,
};
pub use error::ExtractError;
pub use grid::{TableElement, TableLayout, cell, extract_grid, normalize_cell};
pub use html::{HtmlDocument, HtmlTable};
pub use model::{ExportedTable, Grid, Row, StandardizedTable, TableType};
pub use options::{CsvOptions, ExportOptions, TableKindSelection};
pub use standardize::{
    EXTRAS_COLUMN, normalize_timeframe, snake_case, standardize, standardize_dividend,
    standardize_price,
};
pub use tokenize::tokenize;
pub use warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportReport {
    pub tables: Vec<ExportedTable>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExportReport {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|table| table.row_count).sum()
    }
}

fn report_standardization(
    table: &StandardizedTable,
    table_type: TableType,
    index: usize,
    warnings: &mut Vec<ExtractWarning>,
) {
    if !table.standardized {
        warnings.push(
            ExtractWarning::new(
                WarningCode::PriceHeaderNotFound,
                "no open/high/low/close header in the leading rows; exported as-is",
            )
            .with_table_index(index),
        );
    }
    if table.dropped_rows > 0 {
        let message = match table_type {
            TableType::Dividend => "rows without an amount were dropped",
            _ => "rows without a date were dropped",
        };
        warnings.push(
            ExtractWarning::new(WarningCode::RowsDropped, message)
                .with_table_index(index)
                .with_count(table.dropped_rows),
        );
    }
    if table.invalid_dates > 0 {
        warnings.push(
            ExtractWarning::new(
                WarningCode::InvalidDates,
                format!("some dates could not be parsed and were written as {INVALID_DATE}"),
            )
            .with_table_index(index)
            .with_count(table.invalid_dates),
        );
    }
}

/// Standardizes one grid and encodes it as CSV.
pub fn export_grid(
    grid: &Grid,
    table_type: TableType,
    index: usize,
    csv_options: &CsvOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<ExportedTable, ExtractError> {
    let standardized = standardize(grid, table_type)?;
    report_standardization(&standardized, table_type, index, warnings);
    let csv = write_csv_to_string(&standardized.grid, csv_options)?;

    Ok(ExportedTable {
        index,
        table_type,
        timeframe: standardized.timeframe.clone(),
        row_count: standardized.data_row_count(),
        csv,
    })
}

/// Classifies every table and exports the ones that resolve to a known
/// type. `index` counts classified tables only, in document order.
pub fn export_tables<T>(tables: &[T], options: &ExportOptions) -> Result<ExportReport, ExtractError>
where
    T: TableElement,
{
    let mut report = ExportReport::default();
    let mut index = 0;

    for (position, table) in tables.iter().enumerate() {
        let table_type = options.kind.resolve(classify_table(table));
        if table_type == TableType::Unclassified {
            tracing::debug!(position, "skipping unclassified table");
            report.warnings.push(
                ExtractWarning::new(
                    WarningCode::UnclassifiedTable,
                    format!("table at document position {position} is neither price nor dividend"),
                )
                .with_table_index(position),
            );
            continue;
        }

        let current = index;
        index += 1;
        if options.table.is_some_and(|wanted| wanted != current) {
            continue;
        }

        let grid = extract_grid(table);
        let exported = export_grid(&grid, table_type, current, &options.csv, &mut report.warnings)?;
        tracing::info!(
            index = current,
            table_type = %table_type,
            rows = exported.row_count,
            "table exported"
        );
        report.tables.push(exported);
    }

    if let Some(wanted) = options.table
        && report.tables.is_empty()
    {
        return Err(ExtractError::TableNotFound {
            index: wanted,
            available: index,
        });
    }

    Ok(report)
}

pub fn extract_html_to_csv(html: &str, options: &ExportOptions) -> Result<ExportReport, ExtractError> {
    let document = HtmlDocument::parse(html);
    export_tables(document.tables(), options)
}
