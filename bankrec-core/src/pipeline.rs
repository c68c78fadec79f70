//! End-to-end run: preview, validate, extract, normalize, reconcile.

use log::debug;

use crate::error::ReconcileResult;
use crate::ledger::normalize_ledger;
use crate::mapping::ReconciliationRequest;
use crate::preview::preview;
use crate::reconcile::{Report, reconcile};
use crate::statement::extract_statement;
use crate::table::{LedgerTable, TableSource};

/// Run one reconciliation.
///
/// Both mappings are checked before any row is processed: the statement
/// mapping against the columns of the first-page preview, the ledger mapping
/// against the ledger headers.
pub fn run<S>(
    request: &ReconciliationRequest,
    document: &mut S,
    ledger: &LedgerTable,
) -> ReconcileResult<Report>
where
    S: TableSource + ?Sized,
{
    let first = preview(document)?;
    request.statement.validate(&first.columns)?;
    request.ledger.resolve(ledger)?;
    debug!("mapping validated against {} statement column(s)", first.width());

    let extraction = extract_statement(document, &request.statement)?;
    let ledger_txns = normalize_ledger(ledger, &request.ledger)?;

    Ok(reconcile(extraction.transactions, &ledger_txns))
}
