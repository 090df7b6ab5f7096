use csv::{QuoteStyle, WriterBuilder};

use crate::error::ExtractError;
use crate::model::Grid;
use crate::options::CsvOptions;

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

/// Every field quoted, blank rows skipped. Rows may differ in width.
pub fn write_csv_to_string(grid: &Grid, options: &CsvOptions) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(Vec::<u8>::new());
    for row in grid.iter().filter(|row| !is_blank_row(row)) {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}
