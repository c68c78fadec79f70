//! Column mappings chosen by the user for one run.
//!
//! Statement columns are positional indices into raw rows. Ledger columns are
//! header names, resolved to indices once before any row is read.

use serde::{Deserialize, Serialize};

use crate::error::{MappingSide, ReconcileError, ReconcileResult};
use crate::table::LedgerTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountMode {
    /// One signed amount column
    Single,
    /// Separate debit (outflow) and credit (inflow) columns
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountColumns {
    Single { amount_column: usize },
    Split { debit_column: usize, credit_column: usize },
}

/// Statement-side mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub description_column: usize,
    pub amount: AmountColumns,
}

impl ColumnMapping {
    pub fn single(date_column: usize, description_column: usize, amount_column: usize) -> Self {
        Self {
            date_column,
            description_column,
            amount: AmountColumns::Single { amount_column },
        }
    }

    pub fn split(
        date_column: usize,
        description_column: usize,
        debit_column: usize,
        credit_column: usize,
    ) -> Self {
        Self {
            date_column,
            description_column,
            amount: AmountColumns::Split {
                debit_column,
                credit_column,
            },
        }
    }

    /// Default selection for a table `width` columns wide: date first,
    /// description second, amounts at the right edge.
    pub fn suggest(width: usize, mode: AmountMode) -> Self {
        let last = width.saturating_sub(1);
        let description_column = if width > 1 { 1 } else { 0 };
        match mode {
            AmountMode::Single => Self::single(0, description_column, last),
            AmountMode::Split => {
                let debit_column = if width >= 2 { width - 2 } else { 0 };
                Self::split(0, description_column, debit_column, last)
            }
        }
    }

    /// Every selector must name one of the `available` columns observed in
    /// the preview.
    pub fn validate(&self, available: &[usize]) -> ReconcileResult<()> {
        let mut selectors = vec![
            ("date", self.date_column),
            ("description", self.description_column),
        ];
        match self.amount {
            AmountColumns::Single { amount_column } => selectors.push(("amount", amount_column)),
            AmountColumns::Split {
                debit_column,
                credit_column,
            } => {
                selectors.push(("debit", debit_column));
                selectors.push(("credit", credit_column));
            }
        }

        for (role, column) in selectors {
            if !available.contains(&column) {
                return Err(ReconcileError::unmapped(
                    MappingSide::Statement,
                    role,
                    column,
                    available,
                ));
            }
        }
        Ok(())
    }
}

/// Ledger-side mapping by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMapping {
    pub date_column: String,
    /// Net amount, or the credit/inflow side when `debit_column` is set
    pub amount_column: String,
    pub debit_column: Option<String>,
}

impl LedgerMapping {
    pub fn net(date_column: impl Into<String>, amount_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            amount_column: amount_column.into(),
            debit_column: None,
        }
    }

    pub fn split(
        date_column: impl Into<String>,
        credit_column: impl Into<String>,
        debit_column: impl Into<String>,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            amount_column: credit_column.into(),
            debit_column: Some(debit_column.into()),
        }
    }

    /// Resolve header names to indices, failing on the first stale name.
    pub fn resolve(&self, table: &LedgerTable) -> ReconcileResult<ResolvedLedgerMapping> {
        let find = |role: &'static str, name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| {
                    ReconcileError::unmapped(MappingSide::Ledger, role, name, &table.headers)
                })
        };

        Ok(ResolvedLedgerMapping {
            date: find("date", &self.date_column)?,
            amount: find("amount", &self.amount_column)?,
            debit: self
                .debit_column
                .as_deref()
                .map(|name| find("debit", name))
                .transpose()?,
        })
    }
}

/// [`LedgerMapping`] with names replaced by column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLedgerMapping {
    pub date: usize,
    pub amount: usize,
    pub debit: Option<usize>,
}

/// Everything the configuration layer decides for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    pub statement: ColumnMapping,
    pub ledger: LedgerMapping,
}
