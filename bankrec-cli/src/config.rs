use anyhow::{Context, Result, anyhow, bail};
use bankrec_core::{AmountColumns, AmountMode, ColumnMapping, LedgerMapping};
use bankrec_ingest::ReadOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Column mappings and report settings, usually read from
/// `~/.bankrec/config.toml`. Statement columns are zero-based positions in
/// the extracted table; ledger columns are header names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub statement: StatementSection,
    pub ledger: LedgerSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementSection {
    pub amount_mode: AmountMode,
    pub date_column: Option<usize>,
    pub description_column: Option<usize>,
    /// Single mode only
    pub amount_column: Option<usize>,
    /// Split mode: outflows
    pub debit_column: Option<usize>,
    /// Split mode: inflows
    pub credit_column: Option<usize>,
    /// For CSV exports; sniffed when unset
    pub csv_delimiter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub date_column: Option<String>,
    /// Net amount, or inflows when `debit_column` is set
    pub amount_column: Option<String>,
    pub debit_column: Option<String>,
    pub csv_delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub currency_symbol: String,
}

impl Default for StatementSection {
    fn default() -> Self {
        Self {
            amount_mode: AmountMode::Single,
            date_column: None,
            description_column: None,
            amount_column: None,
            debit_column: None,
            credit_column: None,
            csv_delimiter: None,
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            currency_symbol: "€".to_string(),
        }
    }
}

impl StatementSection {
    /// Configured columns, with unset ones taken from the default selection
    /// for a table `width` columns wide.
    pub fn mapping(&self, width: usize) -> ColumnMapping {
        let suggested = ColumnMapping::suggest(width, self.amount_mode);
        let date_column = self.date_column.unwrap_or(suggested.date_column);
        let description_column = self
            .description_column
            .unwrap_or(suggested.description_column);

        match suggested.amount {
            AmountColumns::Single { amount_column } => ColumnMapping::single(
                date_column,
                description_column,
                self.amount_column.unwrap_or(amount_column),
            ),
            AmountColumns::Split {
                debit_column,
                credit_column,
            } => ColumnMapping::split(
                date_column,
                description_column,
                self.debit_column.unwrap_or(debit_column),
                self.credit_column.unwrap_or(credit_column),
            ),
        }
    }

    pub fn read_options(&self) -> Result<ReadOptions> {
        read_options(self.csv_delimiter.as_deref())
    }
}

impl LedgerSection {
    pub fn mapping(&self) -> Result<LedgerMapping> {
        let date_column = self.date_column.clone().ok_or_else(|| {
            anyhow!("ledger date column not set (use --ledger-date or [ledger].date_column)")
        })?;
        let amount_column = self.amount_column.clone().ok_or_else(|| {
            anyhow!("ledger amount column not set (use --ledger-amount or [ledger].amount_column)")
        })?;
        Ok(LedgerMapping {
            date_column,
            amount_column,
            debit_column: self.debit_column.clone(),
        })
    }

    pub fn read_options(&self) -> Result<ReadOptions> {
        read_options(self.csv_delimiter.as_deref())
    }
}

fn read_options(delimiter: Option<&str>) -> Result<ReadOptions> {
    Ok(ReadOptions {
        csv_delimiter: delimiter.map(parse_delimiter).transpose()?,
    })
}

/// A single ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => bail!("invalid CSV delimiter {other:?} (expected one ASCII character or `tab`)"),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write a starter config. Never overwrites an existing file.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    save_config(path, &starter_config())?;
    Ok(true)
}

fn starter_config() -> Config {
    Config {
        statement: StatementSection {
            amount_mode: AmountMode::Split,
            date_column: Some(0),
            description_column: Some(1),
            debit_column: Some(2),
            credit_column: Some(3),
            ..Default::default()
        },
        ledger: LedgerSection {
            date_column: Some("Data".to_string()),
            amount_column: Some("Importo".to_string()),
            ..Default::default()
        },
        report: ReportSection::default(),
    }
}
