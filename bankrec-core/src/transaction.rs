//! Canonical transaction record shared by both sides of a reconciliation

use serde::{Deserialize, Serialize};

/// Where a canonical transaction was extracted from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Source {
    #[serde(rename = "STATEMENT")]
    Statement,
    #[serde(rename = "LEDGER")]
    Ledger,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::Statement => "STATEMENT",
            Source::Ledger => "LEDGER",
        }
    }
}

/// A normalized transaction, independent of the layout it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalTransaction {
    /// Date exactly as extracted; display text only, never parsed
    pub date: String,
    /// Free text with line breaks collapsed to spaces
    pub description: String,
    /// Positive = credit/inflow, negative = debit/outflow
    pub amount: f64,
    pub source: Source,
}

impl CanonicalTransaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        source: Source,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            source,
        }
    }

    /// `amount` rounded to 2 decimal places. This is what matching compares.
    pub fn rounded_amount(&self) -> f64 {
        round_cents(self.amount) as f64 / 100.0
    }

    /// Matching key in integer cents; `None` when the amount is not finite.
    pub fn match_key(&self) -> Option<i64> {
        self.amount.is_finite().then(|| round_cents(self.amount))
    }
}

// Half-to-even on the scaled value, matching the tabular tooling ledgers are
// usually exported from.
fn round_cents(amount: f64) -> i64 {
    (amount * 100.0).round_ties_even() as i64
}

/// Replace every line break (`\r\n`, `\n`, `\r`) with a single space.
pub fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
