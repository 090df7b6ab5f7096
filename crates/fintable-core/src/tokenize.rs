use std::collections::BTreeSet;

/// Splits a header label into lowercase word tokens.
///
/// `"ExDate"` and `"ex_date"` both become `{ex, date}`.
pub fn tokenize(header: &str) -> BTreeSet<String> {
    let mut split = String::with_capacity(header.len() + 4);
    let mut previous_lower = false;
    for ch in header.chars() {
        if previous_lower && ch.is_ascii_uppercase() {
            split.push(' ');
        }
        previous_lower = ch.is_ascii_lowercase();
        split.push(ch);
    }

    split
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
