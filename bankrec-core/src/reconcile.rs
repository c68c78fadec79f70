//! Reconciliation engine: compares statement and ledger transactions.
//!
//! Matching is deliberately coarse. A statement transaction counts as found
//! when any ledger transaction has the same amount rounded to cents; date and
//! description play no part, and one ledger row can account for any number of
//! statement rows with that amount.

use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::amount::format_amount;
use crate::transaction::CanonicalTransaction;

/// A statement movement with no ledger counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub date: String,
    pub description: String,
    pub amount: f64,
}

impl From<&CanonicalTransaction> for MissingEntry {
    fn from(t: &CanonicalTransaction) -> Self {
        Self {
            date: t.date.clone(),
            description: t.description.clone(),
            amount: t.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Every canonical statement transaction, in document order
    pub statement: Vec<CanonicalTransaction>,
    /// Statement transactions whose rounded amount never appears in the ledger
    pub missing_in_ledger: Vec<MissingEntry>,
    /// `sum(statement) - sum(ledger)`
    pub total_difference: f64,
    pub ledger_count: usize,
}

impl Report {
    pub fn is_fully_matched(&self) -> bool {
        self.missing_in_ledger.is_empty()
    }

    pub fn statement_count(&self) -> usize {
        self.statement.len()
    }

    /// Difference formatted for display, e.g. `€ -50.00`.
    pub fn formatted_difference(&self, currency_symbol: &str) -> String {
        if currency_symbol.is_empty() {
            format_amount(self.total_difference)
        } else {
            format!("{currency_symbol} {}", format_amount(self.total_difference))
        }
    }
}

/// Sum that skips `NaN`, as tabular tooling does for missing values.
fn total(txns: &[CanonicalTransaction]) -> f64 {
    txns.iter()
        .map(|t| t.amount)
        .filter(|a| !a.is_nan())
        .sum()
}

/// Compare `statement` against `ledger`. Pure: the result depends only on the
/// two inputs.
pub fn reconcile(statement: Vec<CanonicalTransaction>, ledger: &[CanonicalTransaction]) -> Report {
    let ledger_keys: HashSet<i64> = ledger.iter().filter_map(|t| t.match_key()).collect();

    let missing_in_ledger: Vec<MissingEntry> = statement
        .iter()
        .filter(|t| t.match_key().is_none_or(|k| !ledger_keys.contains(&k)))
        .map(MissingEntry::from)
        .collect();

    let total_difference = total(&statement) - total(ledger);

    info!(
        "reconciled {} statement vs {} ledger transaction(s): {} missing, difference {}",
        statement.len(),
        ledger.len(),
        missing_in_ledger.len(),
        format_amount(total_difference)
    );

    Report {
        statement,
        missing_in_ledger,
        total_difference,
        ledger_count: ledger.len(),
    }
}
