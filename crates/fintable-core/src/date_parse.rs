use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

/// Marks a date cell that is present but could not be understood.
pub const INVALID_DATE: &str = "INVALID_DATE";

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `2024-01-15`, `2024/01/15`, optionally followed by a `HH:MM` time
    Iso,
    /// `January 15, 2024`, `Jan 15 2024`
    MonthDayYear,
    /// `15 January 2024`
    DayMonthYear,
    /// `Mon 15 Jan '24`
    DayMonthShortYear,
    /// `Jan 15, '24`
    MonthDayShortYear,
    /// `01/15/2024`, `15.01.2024`
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Blank,
    Valid { date: NaiveDate, format: DateFormat },
    Invalid,
}

type YearMonthDay = (i32, u32, u32);

struct DateRule {
    format: DateFormat,
    pattern: Regex,
    extract: fn(&Captures<'_>) -> Option<YearMonthDay>,
}

impl DateRule {
    fn new(
        format: DateFormat,
        pattern: &str,
        extract: fn(&Captures<'_>) -> Option<YearMonthDay>,
    ) -> Self {
        Self {
            format,
            pattern: Regex::new(pattern).expect("hardcoded date regex is valid"),
            extract,
        }
    }
}

// Tried in order; the first rule whose pattern and extractor both succeed
// decides the outcome.
static RULES: LazyLock<Vec<DateRule>> = LazyLock::new(|| {
    vec![
        DateRule::new(
            DateFormat::Iso,
            r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:[T\s]\d{1,2}:\d{2}\S*)?$",
            |caps| Some((number(caps, 1)?, number(caps, 2)?, number(caps, 3)?)),
        ),
        DateRule::new(
            DateFormat::MonthDayYear,
            r"(?i)^([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$",
            |caps| Some((number(caps, 3)?, month(caps, 1)?, number(caps, 2)?)),
        ),
        DateRule::new(
            DateFormat::DayMonthYear,
            r"(?i)^(\d{1,2})\s+([a-z]{3,9})\.?,?\s+(\d{4})$",
            |caps| Some((number(caps, 3)?, month(caps, 2)?, number(caps, 1)?)),
        ),
        DateRule::new(
            DateFormat::DayMonthShortYear,
            r"(?i)^(?:[a-z]{3}\.?,?\s+)?(\d{1,2})\s+([a-z]{3,9})\.?\s+['’](\d{2})$",
            |caps| {
                Some((
                    expand_two_digit_year(number(caps, 3)?),
                    month(caps, 2)?,
                    number(caps, 1)?,
                ))
            },
        ),
        DateRule::new(
            DateFormat::MonthDayShortYear,
            r"(?i)^([a-z]{3,9})\.?\s+(\d{1,2}),?\s+['’](\d{2})$",
            |caps| {
                Some((
                    expand_two_digit_year(number(caps, 3)?),
                    month(caps, 1)?,
                    number(caps, 2)?,
                ))
            },
        ),
        DateRule::new(
            DateFormat::Numeric,
            r"^(\d{1,2})[/.](\d{1,2})[/.](\d{4})$",
            |caps| {
                let first: u32 = number(caps, 1)?;
                let second: u32 = number(caps, 2)?;
                let year = number(caps, 3)?;
                // Day-first only when the first field cannot be a month.
                // 03/04/2024 stays month-first.
                if first > 12 && second <= 12 {
                    Some((year, second, first))
                } else {
                    Some((year, first, second))
                }
            },
        ),
    ]
});

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn month(caps: &Captures<'_>, group: usize) -> Option<u32> {
    month_from_name(caps.get(group)?.as_str())
}

/// Full names and any prefix of at least three letters (`sep`, `sept`).
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|full| full.starts_with(&lower))
        .and_then(|index| u32::try_from(index + 1).ok())
}

/// `00-49` land in 2000-2049, `50-99` in 1950-1999.
pub fn expand_two_digit_year(year: i32) -> i32 {
    if year < 50 { 2000 + year } else { 1900 + year }
}

fn validate((year, month, day): YearMonthDay) -> Option<NaiveDate> {
    if !(1900..=2100).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    // Rejects combinations such as Feb 30 instead of rolling them over.
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn parse_date_detailed(input: &str) -> ParsedDate {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return ParsedDate::Blank;
    }

    for rule in RULES.iter() {
        let Some(caps) = rule.pattern.captures(trimmed) else {
            continue;
        };
        let Some(parts) = (rule.extract)(&caps) else {
            continue;
        };
        return match validate(parts) {
            Some(date) => ParsedDate::Valid {
                date,
                format: rule.format,
            },
            None => {
                tracing::debug!(input = trimmed, format = ?rule.format, "date out of range");
                ParsedDate::Invalid
            }
        };
    }

    tracing::debug!(input = trimmed, "unrecognized date format");
    ParsedDate::Invalid
}

/// Canonical `YYYY-MM-DD`, `""` for blank cells, or [`INVALID_DATE`].
pub fn parse_date(input: &str) -> String {
    match parse_date_detailed(input) {
        ParsedDate::Blank => String::new(),
        ParsedDate::Valid { date, .. } => date.format("%Y-%m-%d").to_string(),
        ParsedDate::Invalid => INVALID_DATE.to_string(),
    }
}
