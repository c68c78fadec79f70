//! Statement readers (Document Table Collaborators).

pub mod csv_export;
pub mod delimited;
pub mod pdf;

use std::path::Path;

use bankrec_core::{ReconcileError, ReconcileResult, TableSource};

use crate::types::{FileKind, ReadOptions};

pub use csv_export::CsvStatement;
pub use pdf::PdfStatement;

/// Open a statement by file extension. The returned source owns the document
/// and releases it when dropped.
pub fn open_statement(
    path: impl AsRef<Path>,
    options: ReadOptions,
) -> ReconcileResult<Box<dyn TableSource>> {
    let path = path.as_ref();
    match FileKind::from_path(path) {
        Some(FileKind::Pdf) => Ok(Box::new(PdfStatement::open(path)?)),
        Some(FileKind::Csv) => Ok(Box::new(CsvStatement::open(path, options)?)),
        _ => Err(ReconcileError::Document(format!(
            "unsupported statement format: {} (expected .pdf or .csv)",
            path.display()
        ))),
    }
}
