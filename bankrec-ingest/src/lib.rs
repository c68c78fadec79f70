//! bankrec-ingest: statement readers (PDF layout tables, CSV exports) and
//! ledger readers (CSV, spreadsheets).

pub mod layout;
pub mod ledger;
pub mod parsers;
pub mod types;

pub use ledger::read_ledger;
pub use parsers::{CsvStatement, PdfStatement, open_statement};
pub use types::{FileKind, ReadOptions};
