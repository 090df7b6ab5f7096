use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::tokenize::tokenize;

/// Predicate over a raw header label.
pub type Matcher = fn(&str) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    ExDate,
    Amount,
    Indicator,
    AnnouncementDate,
    PaymentDate,
    Description,
    Open,
    High,
    Low,
    Close,
    Date,
}

/// Claim order for dividend tables. `ExDate` goes first so "Ex Dividend
/// Date" is not taken by `Amount` through its `dividend` token.
pub const DIVIDEND_PRIORITY: &[Column] = &[
    Column::ExDate,
    Column::Amount,
    Column::Indicator,
    Column::AnnouncementDate,
    Column::PaymentDate,
    Column::Description,
];

pub const PRICE_PRIORITY: &[Column] = &[
    Column::Date,
    Column::Open,
    Column::High,
    Column::Low,
    Column::Close,
];

pub const PRICE_REQUIRED: &[Column] = &[Column::Open, Column::High, Column::Low, Column::Close];

pub const DIVIDEND_REQUIRED: &[Column] = &[Column::ExDate, Column::Amount];

impl Column {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExDate => "ex_date",
            Self::Amount => "amount",
            Self::Indicator => "indicator",
            Self::AnnouncementDate => "announcement_date",
            Self::PaymentDate => "payment_date",
            Self::Description => "description",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Date => "date",
        }
    }

    pub fn matcher(self) -> Matcher {
        match self {
            Self::ExDate => is_ex_date,
            Self::Amount => is_amount,
            Self::Indicator => is_indicator,
            Self::AnnouncementDate => is_announcement_date,
            Self::PaymentDate => is_payment_date,
            Self::Description => is_description,
            Self::Open => is_open,
            Self::High => is_high,
            Self::Low => is_low,
            Self::Close => is_close,
            Self::Date => is_date,
        }
    }

    pub fn matches(self, header: &str) -> bool {
        (self.matcher())(header)
    }
}

fn has_any(tokens: &BTreeSet<String>, words: &[&str]) -> bool {
    words.iter().any(|word| tokens.contains(*word))
}

pub fn is_ex_date(header: &str) -> bool {
    has_any(&tokenize(header), &["ex", "xd"])
}

pub fn is_amount(header: &str) -> bool {
    has_any(&tokenize(header), &["amount", "amt", "dividend"])
}

pub fn is_indicator(header: &str) -> bool {
    let tokens = tokenize(header);
    tokens.contains("indicator")
        || (tokens.contains("type") && has_any(&tokens, &["div", "dividend"]))
}

pub fn is_announcement_date(header: &str) -> bool {
    has_any(
        &tokenize(header),
        &["announced", "announcement", "declared", "declaration"],
    )
}

pub fn is_payment_date(header: &str) -> bool {
    has_any(&tokenize(header), &["payment", "pay", "payable", "paid"])
}

pub fn is_description(header: &str) -> bool {
    has_any(&tokenize(header), &["subject", "description"])
}

pub fn is_open(header: &str) -> bool {
    tokenize(header).contains("open")
}

pub fn is_high(header: &str) -> bool {
    tokenize(header).contains("high")
}

pub fn is_low(header: &str) -> bool {
    tokenize(header).contains("low")
}

pub fn is_close(header: &str) -> bool {
    tokenize(header).contains("close")
}

pub fn is_date(header: &str) -> bool {
    tokenize(header).contains("date")
}

/// Which source column each canonical column claimed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    assigned: Vec<(Column, usize)>,
    extras: Vec<usize>,
}

impl ColumnMapping {
    #[must_use]
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.assigned
            .iter()
            .find(|(candidate, _)| *candidate == column)
            .map(|(_, index)| *index)
    }

    #[must_use]
    pub fn has_all(&self, columns: &[Column]) -> bool {
        columns
            .iter()
            .all(|column| self.index_of(*column).is_some())
    }

    /// Claims in priority order.
    #[must_use]
    pub fn assigned(&self) -> &[(Column, usize)] {
        &self.assigned
    }

    /// Unclaimed source indices, ascending.
    #[must_use]
    pub fn extras(&self) -> &[usize] {
        &self.extras
    }
}

/// Greedy claim: for each canonical column in `priority` order, the first
/// unclaimed header cell its matcher accepts becomes its source. A source
/// index is never claimed twice.
pub fn map_columns(header: &[String], priority: &[Column]) -> ColumnMapping {
    let mut claimed = HashSet::new();
    let mut assigned = Vec::new();

    for &column in priority {
        let found = header
            .iter()
            .enumerate()
            .find(|(index, label)| !claimed.contains(index) && column.matches(label))
            .map(|(index, _)| index);
        if let Some(index) = found {
            claimed.insert(index);
            assigned.push((column, index));
        }
    }

    let extras = (0..header.len())
        .filter(|index| !claimed.contains(index))
        .collect();

    ColumnMapping { assigned, extras }
}
