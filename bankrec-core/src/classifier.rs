//! Separates transaction lines from headers, section titles and footers.

use std::sync::OnceLock;

use regex::Regex;

use crate::table::RawRow;

fn digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d").expect("static regex"))
}

/// A row is a transaction only if its date cell is non-empty and contains a
/// digit. This is the only heuristic; nothing else in the row is inspected.
pub fn is_transaction_row(_row: &RawRow, date_value: Option<&str>) -> bool {
    match date_value {
        Some(date) if !date.is_empty() => digit_re().is_match(date),
        _ => false,
    }
}
