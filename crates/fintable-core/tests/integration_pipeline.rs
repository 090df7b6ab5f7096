use std::process::Command;

use fintable_core::{ExportOptions, TableType, WarningCode, extract_html_to_csv};
use tempfile::tempdir;

const QUOTE_PAGE: &str = r#"
<html><body>
  <table id="nav"><tr><td>Home</td><td>Markets</td></tr></table>
  <table>
    <thead>
      <tr><th colspan="5">Weekly</th></tr>
      <tr><th>Open</th><th>High</th><th>Low</th><th>Close</th><th>Volume</th></tr>
    </thead>
    <tbody>
      <tr><td>Jan 08, 2024</td><td>10</td><td>11</td><td>9</td><td>10.5</td><td>1,000</td></tr>
      <tr><td>Jan 01, 2024</td><td>9</td><td>10</td><td>&minus;1</td><td>10</td><td></td></tr>
    </tbody>
  </table>
  <table>
    <thead><tr><th>Ex-Dividend Date</th><th>Cash Amount</th><th>Pay Date</th><th>Financial Year</th><th></th></tr></thead>
    <tbody>
      <tr><td>15/03/2024</td><td>0.42</td><td>Apr 2, 2024</td><td>2024</td><td>View</td></tr>
      <tr><td>02/30/2023</td><td>0.40</td><td>-</td><td></td><td>View</td></tr>
      <tr><td>01/03/2023</td><td>-</td><td></td><td>2023</td><td>View</td></tr>
    </tbody>
  </table>
</body></html>
"#;

#[test]
fn exports_price_and_dividend_tables_from_html() {
    let report =
        extract_html_to_csv(QUOTE_PAGE, &ExportOptions::default()).expect("export should work");

    assert_eq!(report.tables.len(), 2, "report: {report:?}");

    let price = &report.tables[0];
    assert_eq!(price.table_type, TableType::Price);
    assert_eq!(price.timeframe.as_deref(), Some("1W"));
    assert_eq!(
        price.csv,
        concat!(
            "\"date\",\"open\",\"high\",\"low\",\"close\",\"extras\"\n",
            "\"2024-01-08\",\"10\",\"11\",\"9\",\"10.5\",\"{\"\"volume\"\":\"\"1,000\"\"}\"\n",
            "\"2024-01-01\",\"9\",\"10\",\"-1\",\"10\",\"{}\"\n",
        )
    );

    let dividend = &report.tables[1];
    assert_eq!(dividend.table_type, TableType::Dividend);
    assert_eq!(dividend.row_count, 2);
    assert_eq!(
        dividend.csv,
        concat!(
            "\"ex_date\",\"amount\",\"payment_date\",\"extras\"\n",
            "\"2024-03-15\",\"0.42\",\"2024-04-02\",\"{\"\"financial_year\"\":\"\"2024\"\"}\"\n",
            "\"INVALID_DATE\",\"0.40\",\"\",\"{}\"\n",
        )
    );

    let codes = report
        .warnings
        .iter()
        .map(|warning| warning.code)
        .collect::<Vec<_>>();
    assert!(codes.contains(&WarningCode::UnclassifiedTable));
    assert!(codes.contains(&WarningCode::RowsDropped));
    assert!(codes.contains(&WarningCode::InvalidDates));
}

#[test]
fn cli_writes_one_file_per_table() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("quote.html");
    let output = dir.path().join("out");
    std::fs::write(&input, QUOTE_PAGE).expect("HTML fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_table2csv"))
        .args([
            "extract",
            "-i",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(0));
    let price = std::fs::read_to_string(output.join("price_0.csv")).expect("price csv exists");
    assert!(price.starts_with("\"date\",\"open\""));
    assert!(output.join("dividend_1.csv").exists());
}

#[test]
fn cli_exits_with_code_2_when_no_rows() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("empty.html");
    let output = dir.path().join("out");
    std::fs::write(&input, "<p>No tables here</p>").expect("HTML fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_table2csv"))
        .args([
            "extract",
            "-i",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
}
