use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::grid::TableElement;
use crate::model::Row;

static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("hardcoded table selector is valid"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("hardcoded tr selector is valid"));

/// A table read out of static HTML. Rows of nested tables belong to the
/// nested table only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlTable {
    head: Vec<Row>,
    rows: Vec<Row>,
}

impl TableElement for HtmlTable {
    fn head_rows(&self) -> Vec<Row> {
        self.head.clone()
    }

    fn rows(&self) -> Vec<Row> {
        self.rows.clone()
    }
}

fn belongs_to(row: &ElementRef<'_>, table: &ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")
        .is_some_and(|nearest| nearest.id() == table.id())
}

fn is_in_thead(row: &ElementRef<'_>) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "thead")
}

fn row_cells(row: &ElementRef<'_>) -> Row {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| matches!(child.value().name(), "th" | "td"))
        .map(|child| child.text().collect::<String>())
        .collect()
}

fn read_table(table: &ElementRef<'_>) -> HtmlTable {
    let mut head = Vec::new();
    let mut rows = Vec::new();
    for row in table.select(&SELECTOR_TR) {
        if !belongs_to(&row, table) {
            continue;
        }
        let cells = row_cells(&row);
        if is_in_thead(&row) {
            head.push(cells.clone());
        }
        rows.push(cells);
    }
    HtmlTable { head, rows }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlDocument {
    tables: Vec<HtmlTable>,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let tables = document
            .select(&SELECTOR_TABLE)
            .map(|table| read_table(&table))
            .collect();
        Self { tables }
    }

    /// Tables in document order.
    #[must_use]
    pub fn tables(&self) -> &[HtmlTable] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::HtmlDocument;
    use crate::grid::{TableElement, extract_grid};

    #[test]
    fn reads_head_and_body_rows() {
        let html = r"
            <table>
              <thead><tr><th>Date</th><th> Close </th></tr></thead>
              <tbody><tr><td>2024-01-02</td><td>&minus;1.5</td></tr></tbody>
            </table>";
        let document = HtmlDocument::parse(html);
        let table = &document.tables()[0];
        assert_eq!(table.head_rows().len(), 1);
        assert_eq!(
            extract_grid(table),
            vec![vec!["Date", "Close"], vec!["2024-01-02", "-1.5"]]
        );
    }

    #[test]
    fn nested_table_rows_stay_with_nested_table() {
        let html = r"
            <table>
              <tr><td>outer<table><tr><td>inner</td></tr></table></td></tr>
            </table>";
        let document = HtmlDocument::parse(html);
        assert_eq!(document.tables().len(), 2);
        assert_eq!(document.tables()[0].rows().len(), 1);
        assert_eq!(document.tables()[1].rows(), vec![vec!["inner".to_string()]]);
    }
}
