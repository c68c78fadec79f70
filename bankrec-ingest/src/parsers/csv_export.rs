//! Positional CSV exports of a bank statement.
//!
//! The whole file is one page holding one table. There is no header
//! handling: header lines are just rows the classifier rejects.
//!
//! Expected content (decimal commas, `;` delimiter):
//!   Data;Descrizione;Dare;Avere
//!   01/05/2024;BONIFICO STIPENDIO;;1.500,00
//!   02/05/2024;POS SUPERMERCATO;52,30;

use std::path::Path;

use bankrec_core::{RawPage, RawRow, ReconcileError, ReconcileResult, TableSource};

use super::delimited;
use crate::types::ReadOptions;

pub struct CsvStatement {
    rows: Vec<RawRow>,
}

impl CsvStatement {
    pub fn open(path: impl AsRef<Path>, options: ReadOptions) -> ReconcileResult<Self> {
        let path = path.as_ref();
        let content = delimited::read_text(path)
            .map_err(|e| ReconcileError::Document(format!("{e:#}")))?;
        Self::from_text(&content, options)
            .map_err(|e| ReconcileError::Document(format!("{}: {e}", path.display())))
    }

    pub fn from_text(content: &str, options: ReadOptions) -> ReconcileResult<Self> {
        let delimiter = options
            .csv_delimiter
            .unwrap_or_else(|| delimited::sniff_delimiter(content));
        let rows = delimited::records(content, delimiter)
            .map_err(|e| ReconcileError::Document(format!("{e:#}")))?
            .into_iter()
            .map(RawRow::from_texts)
            .collect();
        Ok(Self { rows })
    }
}

impl TableSource for CsvStatement {
    fn page_count(&self) -> usize {
        1
    }

    fn page_tables(&mut self, page: usize) -> ReconcileResult<RawPage> {
        if page > 0 {
            return Err(ReconcileError::Document(format!(
                "page {} out of range",
                page + 1
            )));
        }
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![self.rows.clone()])
    }
}
