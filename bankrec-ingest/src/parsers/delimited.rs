//! Shared reading of delimited text files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

const CANDIDATES: &[u8] = &[b'\t', b';', b',', b'|'];

/// Read a file as UTF-8, falling back to Windows-1252 (common for
/// spreadsheet-exported CSVs, where `€` is byte 0x80).
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    })
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Pick the delimiter that splits the first lines most consistently.
/// More fields wins ties; `,` when nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0usize;
    for &delim in CANDIDATES {
        let counts: Vec<usize> = sample.iter().map(|l| field_count(l, delim)).collect();
        let Some(&target) = counts.first() else {
            break;
        };
        if target <= 1 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == target).count();
        let score = consistent * target;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

/// All records of `content`, ragged rows allowed.
pub fn records(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut out = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("record {}", idx + 1))?;
        out.push(record.iter().map(|f| f.trim().to_string()).collect());
    }
    Ok(out)
}
