//! Locale-formatted monetary strings.
//!
//! Statements use `.` for thousands and `,` for decimals (`1.200,50`), and
//! some print the sign after the number (`100-`). The locale is fixed; it is
//! never detected from the input.

use std::sync::OnceLock;

use regex::Regex;

fn non_numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\-]").expect("static regex"))
}

/// Parse a locale-formatted amount. Never fails: anything unparseable,
/// including a missing or blank cell, yields `0.0`.
///
/// Callers cannot tell a real zero from garbage. Statement rows that parse to
/// zero are discarded anyway.
pub fn parse_locale_amount(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    if raw.trim().is_empty() {
        return 0.0;
    }

    let mut clean: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(body) = clean.strip_suffix('-') {
        clean = format!("-{body}");
    }

    let clean = clean.replace('.', "").replace(',', ".");
    let clean = non_numeric_re().replace_all(&clean, "");

    clean.parse::<f64>().unwrap_or(0.0)
}

/// Render an amount with 2 decimals and `,` thousands grouping: `-1,234.50`.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{amount:.2}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}
