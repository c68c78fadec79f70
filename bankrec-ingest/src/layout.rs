//! Recover positional tables from placed glyphs.
//!
//! Glyphs sharing a baseline form a line. Inside a line, a horizontal gap
//! wider than [`CELL_GAP_EM`] starts a new cell; smaller gaps read as a word
//! space. Columns are rebuilt from cell extents: cells whose spans overlap
//! across rows belong to the same column, so an empty debit cell still leaves
//! the credit amount in the credit column.
//!
//! Expected layout (Dare/Avere):
//!   Data      Descrizione                 Dare        Avere
//!   01/05     BONIFICO STIPENDIO                     100,00
//!             MAGGIO 2024
//!   02/05     POS SUPERMERCATO           50,00

use bankrec_core::{RawPage, RawRow, RawTable};

/// Blocks with fewer row lines than this are layout noise, not tables.
pub const MIN_TABLE_ROWS: usize = 2;

/// Horizontal gap, in ems, that separates two cells.
pub const CELL_GAP_EM: f64 = 1.0;

/// Horizontal gap, in ems, read as a space between words.
const WORD_GAP_EM: f64 = 0.1;

/// Baselines closer than this, in ems, belong to the same line.
const LINE_TOLERANCE_EM: f64 = 0.5;

/// Offsets closer than this, in points, count as the same indentation.
const INDENT_TOLERANCE: f64 = 0.5;

/// One character as placed on the page. Units are points, `y` grows
/// downwards, `size` is the rendered font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub size: f64,
    pub text: String,
}

impl Glyph {
    fn em(&self) -> f64 {
        self.size.max(1.0)
    }

    fn end(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Span {
    start: f64,
    end: f64,
    text: String,
    /// Wrapped text continuing the previous line's cell
    continuation: bool,
}

/// Group glyphs into lines, top to bottom, each sorted left to right.
fn lines(mut glyphs: Vec<Glyph>) -> Vec<Vec<Glyph>> {
    glyphs.retain(|g| !g.text.trim().is_empty());
    glyphs.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut out: Vec<Vec<Glyph>> = Vec::new();
    for g in glyphs {
        match out.last_mut() {
            Some(line) if (g.y - line[0].y).abs() <= LINE_TOLERANCE_EM * g.em() => line.push(g),
            _ => out.push(vec![g]),
        }
    }
    for line in &mut out {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    out
}

fn line_spans(line: &[Glyph]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for g in line {
        match spans.last_mut() {
            Some(span) if g.x - span.end <= CELL_GAP_EM * g.em() => {
                if g.x - span.end > WORD_GAP_EM * g.em() {
                    span.text.push(' ');
                }
                span.text.push_str(&g.text);
                span.end = span.end.max(g.end());
            }
            _ => spans.push(Span {
                start: g.x,
                end: g.end(),
                text: g.text.clone(),
                continuation: false,
            }),
        }
    }
    spans
}

/// A lone cell indented under the previous row, within its columns, wraps
/// that row's text.
fn continues(prev: &[Span], cell: &Span) -> bool {
    match (prev.iter().find(|s| !s.continuation), prev.last()) {
        (Some(first), Some(last)) => {
            cell.start > first.start + INDENT_TOLERANCE
                && cell.start <= last.start + INDENT_TOLERANCE
        }
        _ => false,
    }
}

/// Split one page of glyphs into tables, in reading order.
pub fn page_tables(glyphs: Vec<Glyph>) -> RawPage {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<Span>> = Vec::new();

    for line in lines(glyphs) {
        let mut spans = line_spans(&line);
        if spans.len() >= 2 {
            block.push(spans);
            continue;
        }

        if let (Some(cell), Some(prev)) = (spans.pop(), block.last_mut()) {
            if continues(prev, &cell) {
                prev.push(Span {
                    continuation: true,
                    ..cell
                });
                continue;
            }
        }

        flush(&mut block, &mut tables);
    }
    flush(&mut block, &mut tables);

    tables
}

fn flush(block: &mut Vec<Vec<Span>>, tables: &mut Vec<RawTable>) {
    let lines = std::mem::take(block);
    if lines.len() >= MIN_TABLE_ROWS {
        tables.push(align(lines));
    }
}

/// Merge overlapping cell spans into column intervals.
fn columns(lines: &[Vec<Span>]) -> Vec<(f64, f64)> {
    let mut spans: Vec<(f64, f64)> = lines
        .iter()
        .flatten()
        .map(|s| (s.start, s.end))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn align(lines: Vec<Vec<Span>>) -> RawTable {
    let cols = columns(&lines);

    lines
        .into_iter()
        .map(|spans| {
            let mut cells: Vec<Option<String>> = vec![None; cols.len()];
            for span in spans {
                let Some(idx) = cols.iter().position(|&(s, e)| span.start >= s && span.start < e)
                else {
                    continue;
                };
                let sep = if span.continuation { "\n" } else { " " };
                if let Some(existing) = cells[idx].as_mut() {
                    existing.push_str(sep);
                    existing.push_str(&span.text);
                } else {
                    cells[idx] = Some(span.text);
                }
            }
            RawRow::new(cells)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f64 = 10.0;
    const ADVANCE: f64 = 5.0;

    /// Lay out cells on one baseline: each `(x, text)` starts at `x` and
    /// advances a fixed width per character, spaces included.
    fn row(y: f64, cells: &[(f64, &str)]) -> Vec<Glyph> {
        cells
            .iter()
            .flat_map(|&(x, text)| {
                text.chars().enumerate().map(move |(i, c)| Glyph {
                    x: x + i as f64 * ADVANCE,
                    y,
                    width: ADVANCE,
                    size: SIZE,
                    text: c.to_string(),
                })
            })
            .collect()
    }

    fn page(rows: Vec<Vec<Glyph>>) -> Vec<Glyph> {
        rows.into_iter().flatten().collect()
    }

    #[test]
    fn test_split_columns_keep_their_position() {
        let glyphs = page(vec![
            row(
                100.0,
                &[(50.0, "Data"), (150.0, "Descrizione"), (350.0, "Dare"), (450.0, "Avere")],
            ),
            row(115.0, &[(50.0, "01/05"), (150.0, "BONIFICO STIPENDIO"), (450.0, "100,00")]),
            row(130.0, &[(50.0, "02/05"), (150.0, "POS SUPERMERCATO"), (350.0, "50,00")]),
        ]);
        let tables = page_tables(glyphs);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.len(), 3);
        assert_eq!(t[0].cells.len(), 4);

        assert_eq!(t[1].cell(0), Some("01/05"));
        assert_eq!(t[1].cell(1), Some("BONIFICO STIPENDIO"));
        assert_eq!(t[1].cell(2), None);
        assert_eq!(t[1].cell(3), Some("100,00"));

        assert_eq!(t[2].cell(2), Some("50,00"));
        assert_eq!(t[2].cell(3), None);
    }

    #[test]
    fn test_glyph_order_within_a_page_does_not_matter() {
        let mut glyphs = page(vec![
            row(100.0, &[(50.0, "01/05"), (150.0, "A"), (300.0, "1,00")]),
            row(115.0, &[(50.0, "02/05"), (150.0, "B"), (300.0, "2,00")]),
        ]);
        glyphs.reverse();
        let t = &page_tables(glyphs)[0];
        assert_eq!(t[0].cell(0), Some("01/05"));
        assert_eq!(t[1].cell(2), Some("2,00"));
    }

    #[test]
    fn test_baseline_jitter_stays_on_one_line() {
        let mut glyphs = row(100.0, &[(50.0, "01/05"), (150.0, "A")]);
        glyphs.extend(row(101.5, &[(300.0, "1,00")]));
        glyphs.extend(row(115.0, &[(50.0, "02/05"), (150.0, "B"), (300.0, "2,00")]));
        let t = &page_tables(glyphs)[0];
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].cell(2), Some("1,00"));
    }

    #[test]
    fn test_wrapped_description_joins_with_newline() {
        let glyphs = page(vec![
            row(100.0, &[(50.0, "01/05"), (150.0, "BONIFICO STIPENDIO"), (350.0, "100,00")]),
            row(112.0, &[(150.0, "MAGGIO 2024")]),
            row(124.0, &[(50.0, "02/05"), (150.0, "POS"), (350.0, "50,00-")]),
        ]);
        let tables = page_tables(glyphs);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0][0].cell(1), Some("BONIFICO STIPENDIO\nMAGGIO 2024"));
        assert_eq!(tables[0][1].cell(2), Some("50,00-"));
    }

    #[test]
    fn test_titles_separate_tables_and_lone_lines_are_dropped() {
        let glyphs = page(vec![
            row(40.0, &[(50.0, "ESTRATTO CONTO")]),
            row(55.0, &[(50.0, "IBAN"), (150.0, "IT60X0542811101000000123456")]),
            row(80.0, &[(50.0, "MOVIMENTI")]),
            row(95.0, &[(50.0, "01/05"), (150.0, "A"), (300.0, "1,00")]),
            row(110.0, &[(50.0, "02/05"), (150.0, "B"), (300.0, "2,00")]),
            row(125.0, &[(50.0, "Pagina 1 di 2")]),
            row(140.0, &[(50.0, "03/05"), (150.0, "C"), (300.0, "3,00")]),
            row(155.0, &[(50.0, "04/05"), (150.0, "D"), (300.0, "4,00")]),
        ]);
        let tables = page_tables(glyphs);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0][0].cell(1), Some("A"));
        assert_eq!(tables[1][1].cell(0), Some("04/05"));
    }

    #[test]
    fn test_single_spaces_stay_inside_a_cell() {
        let glyphs = page(vec![
            row(100.0, &[(50.0, "01/05"), (150.0, "POS  SUPERMERCATO"), (300.0, "1,00")]),
            row(115.0, &[(50.0, "02/05"), (150.0, "B"), (300.0, "2,00")]),
        ]);
        let t = &page_tables(glyphs)[0];
        assert_eq!(t[0].cells.len(), 3);
        assert_eq!(t[0].cell(1), Some("POS SUPERMERCATO"));
    }

    #[test]
    fn test_page_without_tables() {
        assert!(page_tables(Vec::new()).is_empty());
        assert!(page_tables(row(100.0, &[(50.0, "Nessun movimento nel periodo")])).is_empty());
    }
}
