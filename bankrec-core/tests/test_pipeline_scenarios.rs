use bankrec_core::{
    Cell, ColumnMapping, LedgerMapping, LedgerTable, RawPage, RawRow, ReconcileError,
    ReconcileResult, ReconciliationRequest, TableSource, run,
};

/// In-memory document that records how many pages were read.
struct Document {
    pages: Vec<RawPage>,
    reads: usize,
}

impl Document {
    fn new(pages: Vec<RawPage>) -> Self {
        Self { pages, reads: 0 }
    }
}

impl TableSource for Document {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_tables(&mut self, page: usize) -> ReconcileResult<RawPage> {
        self.reads += 1;
        Ok(self.pages[page].clone())
    }
}

fn row(cells: &[&str]) -> RawRow {
    RawRow::from_texts(cells.iter().copied())
}

fn ledger(headers: &[&str], rows: Vec<Vec<Cell>>) -> LedgerTable {
    LedgerTable::new(headers.iter().map(|h| h.to_string()).collect(), rows)
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

/// Two-page statement in split (Dare/Avere) layout with header and footer noise.
fn split_statement() -> Document {
    Document::new(vec![
        vec![vec![
            row(&["Data", "Descrizione", "Dare", "Avere"]),
            row(&["Saldo iniziale", "", "", "1.000,00"]),
            row(&["01/05", "BONIFICO\nSTIPENDIO", "", "100,00"]),
            row(&["02/05", "POS SUPERMERCATO", "50,00", ""]),
        ]],
        vec![vec![
            row(&["03/05", "COMMISSIONI", "0,00", ""]),
            row(&["04/05", "AFFITTO", "1.200,50", ""]),
            row(&["", "Totale movimenti", "1.250,50", "100,00"]),
        ]],
    ])
}

#[test]
fn test_split_statement_against_split_ledger() {
    let mut doc = split_statement();
    let table = ledger(
        &["Data", "Entrate", "Uscite"],
        vec![
            vec![text("2024-05-01"), Cell::Number(100.0), Cell::Empty],
            vec![text("2024-05-04"), Cell::Empty, Cell::Number(1200.5)],
        ],
    );
    let request = ReconciliationRequest {
        statement: ColumnMapping::split(0, 1, 2, 3),
        ledger: LedgerMapping::split("Data", "Entrate", "Uscite"),
    };

    let report = run(&request, &mut doc, &table).unwrap();

    let amounts: Vec<f64> = report.statement.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![100.0, -50.0, -1200.5]);
    assert_eq!(report.statement[0].description, "BONIFICO STIPENDIO");

    assert_eq!(report.missing_in_ledger.len(), 1);
    assert_eq!(report.missing_in_ledger[0].description, "POS SUPERMERCATO");
    assert!((report.total_difference - -50.0).abs() < 1e-9);
    assert_eq!(report.formatted_difference("€"), "€ -50.00");
}

#[test]
fn test_single_column_statement_with_trailing_minus() {
    let mut doc = Document::new(vec![vec![vec![
        row(&["01/05", "ACCREDITO", "100,00"]),
        row(&["02/05", "PRELIEVO", "50,00-"]),
    ]]]);
    let table = ledger(
        &["Data", "Importo"],
        vec![vec![text("01/05"), Cell::Number(100.0)]],
    );
    let request = ReconciliationRequest {
        statement: ColumnMapping::single(0, 1, 2),
        ledger: LedgerMapping::net("Data", "Importo"),
    };

    let report = run(&request, &mut doc, &table).unwrap();
    assert_eq!(report.missing_in_ledger.len(), 1);
    assert_eq!(report.missing_in_ledger[0].amount, -50.0);
    assert_eq!(report.missing_in_ledger[0].date, "02/05");
    assert_eq!(report.total_difference, -50.0);
}

#[test]
fn test_stale_statement_column_fails_before_full_pass() {
    let mut doc = split_statement();
    let table = ledger(&["Data", "Importo"], vec![]);
    let request = ReconciliationRequest {
        statement: ColumnMapping::single(0, 1, 9),
        ledger: LedgerMapping::net("Data", "Importo"),
    };

    let err = run(&request, &mut doc, &table).unwrap_err();
    assert!(matches!(err, ReconcileError::UnmappedColumn { role: "amount", .. }));
    // Only the preview page was read.
    assert_eq!(doc.reads, 1);
}

#[test]
fn test_stale_ledger_column_fails_before_full_pass() {
    let mut doc = split_statement();
    let table = ledger(&["Data", "Importo"], vec![]);
    let request = ReconciliationRequest {
        statement: ColumnMapping::split(0, 1, 2, 3),
        ledger: LedgerMapping::net("Date", "Importo"),
    };

    let err = run(&request, &mut doc, &table).unwrap_err();
    assert!(err.to_string().contains("ledger date column `Date`"));
    assert_eq!(doc.reads, 1);
}

#[test]
fn test_document_without_tables_is_source_empty() {
    let mut doc = Document::new(vec![vec![]]);
    let table = ledger(&["Data", "Importo"], vec![]);
    let request = ReconciliationRequest {
        statement: ColumnMapping::single(0, 1, 2),
        ledger: LedgerMapping::net("Data", "Importo"),
    };

    let err = run(&request, &mut doc, &table).unwrap_err();
    assert!(matches!(err, ReconcileError::SourceEmpty));
}

#[test]
fn test_ledger_zero_rows_are_not_filtered() {
    // A 0.00 ledger row stays in the ledger collection; statement zeros do not.
    let mut doc = Document::new(vec![vec![vec![
        row(&["01/05", "A", "10,00"]),
        row(&["02/05", "B", "0,00"]),
    ]]]);
    let table = ledger(
        &["Data", "Importo"],
        vec![
            vec![text("01/05"), Cell::Number(10.0)],
            vec![text("02/05"), Cell::Number(0.0)],
        ],
    );
    let request = ReconciliationRequest {
        statement: ColumnMapping::single(0, 1, 2),
        ledger: LedgerMapping::net("Data", "Importo"),
    };

    let report = run(&request, &mut doc, &table).unwrap();
    assert_eq!(report.statement_count(), 1);
    assert_eq!(report.ledger_count, 2);
    assert!(report.is_fully_matched());
}
