//! Ledger readers (Tabular Ledger Collaborator).
//!
//! The first row names the columns. Cells keep their type: spreadsheets
//! provide it directly, CSV cells that parse as plain numbers (`1200.5`,
//! `-50`) become numbers and everything else stays text.

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate};
use log::debug;

use bankrec_core::{Cell, LedgerTable};

use crate::parsers::delimited;
use crate::types::{FileKind, ReadOptions};

/// Read a ledger, choosing the reader by file extension.
pub fn read_ledger(path: impl AsRef<Path>, options: ReadOptions) -> Result<LedgerTable> {
    let path = path.as_ref();
    let table = match FileKind::from_path(path) {
        Some(FileKind::Csv) => read_ledger_csv(path, options)?,
        Some(FileKind::Spreadsheet) => read_ledger_workbook(path)?,
        _ => bail!(
            "unsupported ledger format: {} (expected .xlsx, .xls, .ods or .csv)",
            path.display()
        ),
    };
    debug!(
        "ledger {}: {} column(s), {} row(s)",
        path.display(),
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

pub fn read_ledger_csv(path: &Path, options: ReadOptions) -> Result<LedgerTable> {
    let content = delimited::read_text(path)?;
    ledger_from_csv_text(&content, options).with_context(|| format!("parsing {}", path.display()))
}

pub fn ledger_from_csv_text(content: &str, options: ReadOptions) -> Result<LedgerTable> {
    let delimiter = options
        .csv_delimiter
        .unwrap_or_else(|| delimited::sniff_delimiter(content));
    let mut records = delimited::records(content, delimiter)?.into_iter();

    let Some(headers) = records.next() else {
        bail!("ledger is empty (no header row)");
    };
    let rows = records
        .map(|record| record.iter().map(|s| csv_cell(s)).collect())
        .collect();

    Ok(LedgerTable::new(headers, rows))
}

fn csv_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        return Cell::Empty;
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::Text(raw.to_string()),
    }
}

/// First sheet of a workbook; the first row holds the headers.
pub fn read_ledger_workbook(path: &Path) -> Result<LedgerTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        bail!("{} contains no sheets", path.display());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{sheet}' of {}", path.display()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("sheet '{sheet}' is empty (no header row)");
    };
    let headers = header_row.iter().map(header_text).collect();
    let rows = rows.map(|r| r.iter().map(workbook_cell).collect()).collect();

    Ok(LedgerTable::new(headers, rows))
}

fn header_text(data: &Data) -> String {
    match workbook_cell(data) {
        Cell::Empty => String::new(),
        other => other.to_text(),
    }
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match serial_to_date(dt.as_f64()) {
            Some(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Excel 1900-system date serial to a calendar date (time of day dropped).
///
/// Serial 1 is 1900-01-01. Excel counts a 1900-02-29 that never existed as
/// serial 60, which has no date; every later serial is one day ahead.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.trunc() as u64;
    let epoch = match days {
        ..60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        60 => return None,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_days(Days::new(days))
}
