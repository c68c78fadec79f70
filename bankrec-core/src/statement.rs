//! Statement-side normalization: raw document rows to canonical transactions.

use log::{debug, info};

use crate::amount::parse_locale_amount;
use crate::classifier::is_transaction_row;
use crate::error::{ReconcileResult, RowError};
use crate::mapping::{AmountColumns, ColumnMapping};
use crate::table::{RawRow, RawTable, TableSource};
use crate::transaction::{CanonicalTransaction, Source, collapse_line_breaks};

/// Normalize one raw row under `mapping`.
///
/// Debit is an outflow, so in split mode `amount = credit - debit`.
pub fn normalize_row(
    row: &RawRow,
    mapping: &ColumnMapping,
) -> Result<CanonicalTransaction, RowError> {
    let date = row.cell(mapping.date_column);
    if !is_transaction_row(row, date) {
        return Err(RowError::NotATransaction {
            date: date.map(str::to_string),
        });
    }

    let amount = match mapping.amount {
        AmountColumns::Single { amount_column } => parse_locale_amount(row.cell(amount_column)),
        AmountColumns::Split {
            debit_column,
            credit_column,
        } => {
            let debit = parse_locale_amount(row.cell(debit_column));
            let credit = parse_locale_amount(row.cell(credit_column));
            credit - debit
        }
    };
    if amount == 0.0 {
        return Err(RowError::ZeroAmount);
    }

    let description = row
        .cell(mapping.description_column)
        .map(collapse_line_breaks)
        .unwrap_or_default();

    Ok(CanonicalTransaction::new(
        date.unwrap_or_default(),
        description,
        amount,
        Source::Statement,
    ))
}

/// How many rows were discarded, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub not_a_transaction: usize,
    pub zero_amount: usize,
}

impl SkipCounts {
    pub fn record(&mut self, err: &RowError) {
        match err {
            RowError::NotATransaction { .. } => self.not_a_transaction += 1,
            RowError::ZeroAmount => self.zero_amount += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.not_a_transaction + self.zero_amount
    }
}

/// Canonical statement transactions plus what was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub transactions: Vec<CanonicalTransaction>,
    pub skipped: SkipCounts,
}

/// Row swallow policy: keep every `Ok`, count and drop every [`RowError`].
pub fn keep_transactions<I>(results: I) -> Extraction
where
    I: IntoIterator<Item = Result<CanonicalTransaction, RowError>>,
{
    let mut out = Extraction::default();
    for result in results {
        match result {
            Ok(txn) => out.transactions.push(txn),
            Err(err) => {
                debug!("skipping statement row: {err}");
                out.skipped.record(&err);
            }
        }
    }
    out
}

/// Normalize every row of `tables`, in order.
pub fn normalize_tables<'a, I>(tables: I, mapping: &ColumnMapping) -> Extraction
where
    I: IntoIterator<Item = &'a RawTable>,
{
    keep_transactions(
        tables
            .into_iter()
            .flat_map(|table| table.iter())
            .map(|row| normalize_row(row, mapping)),
    )
}

/// Full-document pass: every table of every page. A failing page aborts the
/// run; a failing row never does.
pub fn extract_statement<S>(source: &mut S, mapping: &ColumnMapping) -> ReconcileResult<Extraction>
where
    S: TableSource + ?Sized,
{
    let mut out = Extraction::default();

    for page in 0..source.page_count() {
        let tables = source.page_tables(page)?;
        debug!("page {}: {} table(s)", page + 1, tables.len());

        let page_out = normalize_tables(&tables, mapping);
        out.transactions.extend(page_out.transactions);
        out.skipped.not_a_transaction += page_out.skipped.not_a_transaction;
        out.skipped.zero_amount += page_out.skipped.zero_amount;
    }

    info!(
        "statement: {} transaction(s), {} row(s) skipped",
        out.transactions.len(),
        out.skipped.total()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::table::RawPage;

    fn row(cells: &[&str]) -> RawRow {
        RawRow::from_texts(cells.iter().copied())
    }

    #[test]
    fn test_single_mode_row() {
        let mapping = ColumnMapping::single(0, 1, 2);
        let txn =
            normalize_row(&row(&["01/05", "STIPENDIO\nMAGGIO", "1.500,00"]), &mapping).unwrap();
        assert_eq!(txn.date, "01/05");
        assert_eq!(txn.description, "STIPENDIO MAGGIO");
        assert_eq!(txn.amount, 1500.0);
        assert_eq!(txn.source, Source::Statement);
    }

    #[test]
    fn test_split_mode_is_credit_minus_debit() {
        let mapping = ColumnMapping::split(0, 1, 2, 3);
        let debit_only = normalize_row(&row(&["02/05", "POS", "50,00", ""]), &mapping).unwrap();
        assert_eq!(debit_only.amount, -50.0);

        let credit_only =
            normalize_row(&row(&["03/05", "BONIFICO", "", "200,00"]), &mapping).unwrap();
        assert_eq!(credit_only.amount, 200.0);

        let both =
            normalize_row(&row(&["04/05", "RETTIFICA", "10,00", "25,50"]), &mapping).unwrap();
        assert_eq!(both.amount, 15.5);
    }

    #[test]
    fn test_split_mode_short_row_counts_missing_credit_as_empty() {
        let mapping = ColumnMapping::split(0, 1, 2, 3);
        let txn = normalize_row(&row(&["02/05", "POS", "50,00"]), &mapping).unwrap();
        assert_eq!(txn.amount, -50.0);
    }

    #[test]
    fn test_zero_amount_row_is_discarded() {
        let mapping = ColumnMapping::single(0, 1, 2);
        assert_eq!(
            normalize_row(&row(&["01/05", "INFO", "0,00"]), &mapping),
            Err(RowError::ZeroAmount)
        );
        assert_eq!(
            normalize_row(&row(&["01/05", "INFO", "n.d."]), &mapping),
            Err(RowError::ZeroAmount)
        );
    }

    #[test]
    fn test_non_transaction_row_is_rejected_before_amount() {
        let mapping = ColumnMapping::single(0, 1, 2);
        let err = normalize_row(&row(&["Saldo iniziale", "", "1.000,00"]), &mapping).unwrap_err();
        assert_eq!(
            err,
            RowError::NotATransaction {
                date: Some("Saldo iniziale".to_string())
            }
        );
    }

    #[test]
    fn test_missing_description_is_empty() {
        let mapping = ColumnMapping::single(0, 5, 1);
        let txn = normalize_row(&row(&["01/05", "9,99"]), &mapping).unwrap();
        assert_eq!(txn.description, "");
    }

    #[test]
    fn test_keep_transactions_counts_skips() {
        let results = vec![
            Ok(CanonicalTransaction::new("01/05", "a", 1.0, Source::Statement)),
            Err(RowError::ZeroAmount),
            Err(RowError::NotATransaction { date: None }),
            Err(RowError::NotATransaction { date: Some("Data".into()) }),
            Ok(CanonicalTransaction::new("02/05", "b", -2.0, Source::Statement)),
        ];
        let out = keep_transactions(results);
        assert_eq!(out.transactions.len(), 2);
        assert_eq!(out.skipped, SkipCounts { not_a_transaction: 2, zero_amount: 1 });
        assert_eq!(out.skipped.total(), 3);
    }

    #[test]
    fn test_no_zero_amount_survives() {
        let mapping = ColumnMapping::split(0, 1, 2, 3);
        let table: RawTable = vec![
            row(&["01/05", "a", "10,00", "10,00"]),
            row(&["02/05", "b", "", ""]),
            row(&["03/05", "c", "1,00", ""]),
            row(&["04/05", "d", "abc", "xyz"]),
        ];
        let out = normalize_tables([&table], &mapping);
        assert!(out.transactions.iter().all(|t| t.amount != 0.0));
        assert_eq!(out.transactions.len(), 1);
        assert_eq!(out.skipped.zero_amount, 3);
    }

    struct Pages(Vec<ReconcileResult<RawPage>>);

    impl TableSource for Pages {
        fn page_count(&self) -> usize {
            self.0.len()
        }

        fn page_tables(&mut self, page: usize) -> ReconcileResult<RawPage> {
            std::mem::replace(&mut self.0[page], Ok(Vec::new()))
        }
    }

    #[test]
    fn test_extract_statement_walks_every_page_and_table() {
        let mapping = ColumnMapping::single(0, 1, 2);
        let mut source = Pages(vec![
            Ok(vec![
                vec![row(&["Data", "Descrizione", "Importo"]), row(&["01/05", "a", "100,00"])],
                vec![row(&["02/05", "b", "50,00-"])],
            ]),
            Ok(vec![]),
            Ok(vec![vec![row(&["03/05", "c", "7,00"]), row(&["Pagina 3 di 3"])]]),
        ]);

        let out = extract_statement(&mut source, &mapping).unwrap();
        let amounts: Vec<f64> = out.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![100.0, -50.0, 7.0]);
        assert_eq!(out.skipped.not_a_transaction, 1);
    }

    #[test]
    fn test_page_failure_aborts_extraction() {
        let mapping = ColumnMapping::single(0, 1, 2);
        let mut source = Pages(vec![
            Ok(vec![vec![row(&["01/05", "a", "100,00"])]]),
            Err(ReconcileError::Document("page 2 is corrupt".into())),
        ]);
        let err = extract_statement(&mut source, &mapping).unwrap_err();
        assert!(matches!(err, ReconcileError::Document(_)));
    }
}
