//! Ledger-side normalization.
//!
//! Ledger amounts are already typed numbers, so no locale parsing happens
//! here. Unlike the statement side, zero amounts are kept.

use log::info;

use crate::error::{ReconcileError, ReconcileResult};
use crate::mapping::LedgerMapping;
use crate::table::{Cell, LedgerTable};
use crate::transaction::{CanonicalTransaction, Source};

/// Normalize every ledger row under `mapping`.
///
/// Net mode takes the amount cell at face value, with an empty cell as `NaN`
/// (it never matches and totals skip it). Split mode fills empty cells with
/// zero and computes `amount - debit`.
pub fn normalize_ledger(
    table: &LedgerTable,
    mapping: &LedgerMapping,
) -> ReconcileResult<Vec<CanonicalTransaction>> {
    let cols = mapping.resolve(table)?;

    let mut out = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let numeric = |column: usize, empty: f64| -> ReconcileResult<f64> {
            match table.cell(row, column) {
                Cell::Number(n) => Ok(*n),
                Cell::Empty => Ok(empty),
                Cell::Text(value) => Err(ReconcileError::NonNumericCell {
                    // 1-based, counting the header row
                    row: row + 2,
                    column: table.headers[column].clone(),
                    value: value.clone(),
                }),
            }
        };

        let amount = match cols.debit {
            None => numeric(cols.amount, f64::NAN)?,
            Some(debit) => numeric(cols.amount, 0.0)? - numeric(debit, 0.0)?,
        };

        out.push(CanonicalTransaction::new(
            table.cell(row, cols.date).to_text(),
            String::new(),
            amount,
            Source::Ledger,
        ));
    }

    info!("ledger: {} transaction(s)", out.len());
    Ok(out)
}
