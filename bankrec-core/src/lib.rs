//! bankrec-core: statement/ledger extraction, normalization and reconciliation

pub mod amount;
pub mod classifier;
pub mod error;
pub mod ledger;
pub mod mapping;
pub mod pipeline;
pub mod preview;
pub mod reconcile;
pub mod statement;
pub mod table;
pub mod transaction;

pub use amount::{format_amount, parse_locale_amount};
pub use classifier::is_transaction_row;
pub use error::{MappingSide, ReconcileError, ReconcileResult, RowError};
pub use ledger::normalize_ledger;
pub use mapping::{
    AmountColumns, AmountMode, ColumnMapping, LedgerMapping, ReconciliationRequest,
    ResolvedLedgerMapping,
};
pub use pipeline::run;
pub use preview::{PREVIEW_ROWS, Preview, preview};
pub use reconcile::{MissingEntry, Report, reconcile};
pub use statement::{Extraction, SkipCounts, extract_statement, keep_transactions, normalize_row};
pub use table::{Cell, LedgerTable, RawPage, RawRow, RawTable, TableSource};
pub use transaction::{CanonicalTransaction, Source};
