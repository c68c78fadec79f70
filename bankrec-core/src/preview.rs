//! First-page preview used to choose a column mapping.

use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, ReconcileResult};
use crate::mapping::{AmountMode, ColumnMapping};
use crate::table::{RawRow, TableSource};

pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    /// Column identifiers a mapping may select from
    pub columns: Vec<usize>,
    /// Leading non-blank rows of the first table
    pub rows: Vec<RawRow>,
    /// Non-blank rows in the first table
    pub total_rows: usize,
}

impl Preview {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn suggest(&self, mode: AmountMode) -> ColumnMapping {
        ColumnMapping::suggest(self.width(), mode)
    }
}

/// Read the first table of the first page, dropping rows that are entirely
/// blank. Fails with [`ReconcileError::SourceEmpty`] when there is no table.
pub fn preview<S>(source: &mut S) -> ReconcileResult<Preview>
where
    S: TableSource + ?Sized,
{
    if source.page_count() == 0 {
        return Err(ReconcileError::SourceEmpty);
    }

    let first = source
        .page_tables(0)?
        .into_iter()
        .next()
        .ok_or(ReconcileError::SourceEmpty)?;

    // Columns come from the table as extracted, blank rows included.
    let width = first.iter().map(RawRow::width).max().unwrap_or(0);
    let rows: Vec<RawRow> = first.into_iter().filter(|r| !r.is_blank()).collect();

    Ok(Preview {
        columns: (0..width).collect(),
        total_rows: rows.len(),
        rows: rows.into_iter().take(PREVIEW_ROWS).collect(),
    })
}
