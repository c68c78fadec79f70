//! Plain-text rendering of previews and reports.

use bankrec_core::{
    AmountColumns, AmountMode, ColumnMapping, LedgerTable, Preview, Report, format_amount,
};
use serde::Serialize;

const MAX_CELL_WIDTH: usize = 40;

fn clip(text: &str) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        flat
    } else {
        let mut s: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        s.push('…');
        s
    }
}

/// Left-aligned text table; `right` marks right-aligned columns.
fn table(headers: &[String], rows: &[Vec<String>], right: &[usize]) -> String {
    let cols = headers.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; cols];
    for row in std::iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |row: &[String]| -> String {
        let cells: Vec<String> = (0..cols)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                if right.contains(&i) {
                    format!("{cell:>w$}", w = widths[i])
                } else {
                    format!("{cell:<w$}", w = widths[i])
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn describe_mapping(mapping: &ColumnMapping) -> String {
    let amounts = match mapping.amount {
        AmountColumns::Single { amount_column } => format!("amount={amount_column}"),
        AmountColumns::Split {
            debit_column,
            credit_column,
        } => format!("debit={debit_column} credit={credit_column}"),
    };
    format!(
        "date={} description={} {amounts}",
        mapping.date_column, mapping.description_column
    )
}

pub fn preview(preview: &Preview, ledger: Option<&LedgerTable>) -> String {
    let headers: Vec<String> = preview.columns.iter().map(|c| format!("[{c}]")).collect();
    let rows: Vec<Vec<String>> = preview
        .rows
        .iter()
        .map(|r| {
            (0..preview.width())
                .map(|i| r.cell(i).map(clip).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut out = format!(
        "Statement preview: first table of page 1 ({} of {} rows)\n\n",
        preview.rows.len(),
        preview.total_rows
    );
    out.push_str(&table(&headers, &rows, &[]));
    out.push_str(&format!(
        "\nColumns: {}\n",
        preview
            .columns
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    out.push_str(&format!(
        "Suggested (single amount): {}\n",
        describe_mapping(&preview.suggest(AmountMode::Single))
    ));
    out.push_str(&format!(
        "Suggested (debit/credit):  {}\n",
        describe_mapping(&preview.suggest(AmountMode::Split))
    ));

    if let Some(ledger) = ledger {
        out.push_str(&format!(
            "\nLedger columns ({} rows): {}\n",
            ledger.len(),
            ledger.headers.join(", ")
        ));
    }
    out
}

pub fn report(report: &Report, currency_symbol: &str) -> String {
    let mut out = format!("Statement movements ({})\n\n", report.statement_count());

    let headers = ["Date", "Description", "Amount", "Source"].map(String::from);
    let rows: Vec<Vec<String>> = report
        .statement
        .iter()
        .map(|t| {
            vec![
                clip(&t.date),
                clip(&t.description),
                format_amount(t.amount),
                t.source.label().to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&headers, &rows, &[2]));
    out.push('\n');

    if report.is_fully_matched() {
        out.push_str("All statement movements were found in the ledger.\n");
    } else {
        out.push_str(&format!(
            "{} movement(s) in the statement but NOT in the ledger:\n\n",
            report.missing_in_ledger.len()
        ));
        let headers = ["Date", "Description", "Amount"].map(String::from);
        let rows: Vec<Vec<String>> = report
            .missing_in_ledger
            .iter()
            .map(|m| vec![clip(&m.date), clip(&m.description), format_amount(m.amount)])
            .collect();
        out.push_str(&table(&headers, &rows, &[2]));
    }

    out.push_str(&format!(
        "\nTotal difference: {}\n",
        report.formatted_difference(currency_symbol)
    ));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a Report,
    total_difference_display: String,
}

pub fn report_json(report: &Report, currency_symbol: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        report,
        total_difference_display: report.formatted_difference(currency_symbol),
    })
}
