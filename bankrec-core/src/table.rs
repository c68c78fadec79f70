//! Raw tabular shapes handed to the core by its collaborators.
//!
//! Statement tables are positional and untyped (every cell is optional text
//! as a document extractor produced it). Ledger tables have named columns
//! and typed cells.

use serde::{Deserialize, Serialize};

use crate::error::ReconcileResult;

/// One extracted statement row, addressed by zero-based column index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Build a row from text cells, mapping empty strings to `None`.
    pub fn from_texts<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = cells
            .into_iter()
            .map(Into::into)
            .map(|s: String| if s.is_empty() { None } else { Some(s) })
            .collect();
        Self { cells }
    }

    /// Cell text at `column`; a cell past the end of a short row is `None`.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell holds any non-blank text.
    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

pub type RawTable = Vec<RawRow>;

/// Tables found on one document page, in reading order.
pub type RawPage = Vec<RawTable>;

/// Document Table Collaborator: yields the tables of each page.
///
/// Implementations own the open document and release it on drop.
pub trait TableSource {
    fn page_count(&self) -> usize;

    /// Tables on page `page` (zero-based). A page without tables is an empty vec.
    fn page_tables(&mut self, page: usize) -> ReconcileResult<RawPage>;
}

/// A typed ledger cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Display text for a cell whose value is used verbatim (dates).
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Rectangular ledger with a header row naming every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl LedgerTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `column`); short rows read as [`Cell::Empty`].
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(EMPTY)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
