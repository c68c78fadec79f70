//! Error taxonomy for a reconciliation run.
//!
//! Row-level problems ([`RowError`]) are recoverable and never leave the
//! statement extractor. Everything in [`ReconcileError`] halts the current
//! run and is reported once to the user.

use std::fmt;

use thiserror::Error;

/// Why a single raw statement row did not become a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The date cell is empty or carries no digit (headers, section titles, footers).
    #[error("row is not a transaction line (date cell: {date:?})")]
    NotATransaction { date: Option<String> },
    /// The amount parsed to zero: unparseable or non-monetary content.
    #[error("row amount is zero")]
    ZeroAmount,
}

impl RowError {
    /// Stable short label used for skip counters and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::NotATransaction { .. } => "not-a-transaction",
            RowError::ZeroAmount => "zero-amount",
        }
    }
}

/// Which input a mapping selector refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSide {
    Statement,
    Ledger,
}

impl fmt::Display for MappingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingSide::Statement => f.write_str("statement"),
            MappingSide::Ledger => f.write_str("ledger"),
        }
    }
}

/// Fatal errors for one reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("no tables found on the first page of the statement (is it a scanned image?)")]
    SourceEmpty,

    #[error("{side} {role} column `{column}` does not exist (available: {available})")]
    UnmappedColumn {
        side: MappingSide,
        role: &'static str,
        column: String,
        available: String,
    },

    #[error("ledger row {row}: column `{column}` holds non-numeric value {value:?}")]
    NonNumericCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("statement document: {0}")]
    Document(String),
}

impl ReconcileError {
    pub(crate) fn unmapped(
        side: MappingSide,
        role: &'static str,
        column: impl ToString,
        available: &[impl ToString],
    ) -> Self {
        let available = available
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ReconcileError::UnmappedColumn {
            side,
            role,
            column: column.to_string(),
            available,
        }
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
