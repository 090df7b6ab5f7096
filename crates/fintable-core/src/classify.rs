use crate::columns::{DIVIDEND_REQUIRED, PRICE_REQUIRED};
use crate::grid::{TableElement, normalize_row};
use crate::model::{Row, TableType};

/// Rows past this point are never considered as a header.
pub const HEADER_LOOKAHEAD: usize = 5;

/// True when the cells jointly satisfy open, high, low and close.
pub fn is_price_header(cells: &[String]) -> bool {
    PRICE_REQUIRED
        .iter()
        .all(|column| cells.iter().any(|cell| column.matches(cell)))
}

fn is_dividend_header(cells: &[String]) -> bool {
    DIVIDEND_REQUIRED
        .iter()
        .all(|column| cells.iter().any(|cell| column.matches(cell)))
}

/// Header-region rows bottom-up, then the leading table rows bottom-up.
/// The row nearest the data wins on multi-row headers.
fn price_candidates<'a>(head: &'a [Row], rows: &'a [Row]) -> impl Iterator<Item = &'a Row> {
    head.iter()
        .rev()
        .chain(rows.iter().take(HEADER_LOOKAHEAD).rev())
}

pub fn classify_rows(head: &[Row], rows: &[Row]) -> TableType {
    let head = head.iter().map(|row| normalize_row(row)).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .take(HEADER_LOOKAHEAD)
        .map(|row| normalize_row(row))
        .collect::<Vec<_>>();

    // Price first: four required columns is the stricter test, and its
    // vocabulary overlaps with dividend headers.
    if price_candidates(&head, &rows).any(|row| is_price_header(row)) {
        return TableType::Price;
    }

    let header_cells = if head.is_empty() {
        rows.first().cloned().unwrap_or_default()
    } else {
        head.concat()
    };
    if is_dividend_header(&header_cells) {
        return TableType::Dividend;
    }

    TableType::Unclassified
}

pub fn classify_table<T>(table: &T) -> TableType
where
    T: TableElement + ?Sized,
{
    classify_rows(&table.head_rows(), &table.rows())
}

#[cfg(test)]
mod tests {
    use super::classify_table;
    use crate::grid::TableLayout;
    use crate::model::TableType;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn ohlc_header_is_price() {
        let table = TableLayout::with_head(
            vec![
                row(&["Date", "Open", "High", "Low", "Close"]),
                row(&["2024-01-02", "1", "2", "0.5", "1.5"]),
            ],
            1,
        );
        assert_eq!(classify_table(&table), TableType::Price);
    }

    #[test]
    fn missing_any_price_column_is_unclassified() {
        let full = ["Date", "Open", "High", "Low", "Close"];
        for skip in 1..full.len() {
            let header = full
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != skip)
                .map(|(_, label)| *label)
                .collect::<Vec<_>>();
            let table = TableLayout::from_rows(vec![row(&header), row(&["x", "1", "2", "3"])]);
            assert_eq!(classify_table(&table), TableType::Unclassified, "{header:?}");
        }
    }

    #[test]
    fn multi_row_header_prefers_row_nearest_the_data() {
        let table = TableLayout::with_head(
            vec![
                row(&["Historical prices", "1D"]),
                row(&["Open", "High", "Low", "Close", "Volume"]),
                row(&["Jan 2, 2024", "1", "2", "0.5", "1.5", "100"]),
            ],
            2,
        );
        assert_eq!(classify_table(&table), TableType::Price);
    }

    #[test]
    fn falls_back_to_leading_rows_without_thead() {
        let table = TableLayout::from_rows(vec![
            row(&["Daily"]),
            row(&["Date", "Open Price", "High", "Low", "Close Price"]),
            row(&["2024-01-02", "1", "2", "0.5", "1.5"]),
        ]);
        assert_eq!(classify_table(&table), TableType::Price);
    }

    #[test]
    fn ex_date_and_amount_is_dividend() {
        let table = TableLayout::with_head(
            vec![
                row(&["Ex-Date", "Amount", "Pay Date"]),
                row(&["2024-03-01", "0.25", "2024-03-15"]),
            ],
            1,
        );
        assert_eq!(classify_table(&table), TableType::Dividend);
    }

    #[test]
    fn unrelated_header_is_unclassified() {
        let table = TableLayout::from_rows(vec![row(&["Name", "Score"]), row(&["a", "1"])]);
        assert_eq!(classify_table(&table), TableType::Unclassified);
    }
}
