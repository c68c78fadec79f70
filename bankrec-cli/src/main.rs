use anyhow::{Context, Result};
use bankrec_core::{AmountMode, ReconciliationRequest};
use bankrec_ingest::{open_statement, read_ledger};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod render;
mod state;

use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "bankrec",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BANKREC_REVISION"), ")"),
    about = "Reconcile a bank statement against your own ledger"
)]
struct Cli {
    /// Config file (default: ~/.bankrec/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the first statement table with column indices, to choose a mapping
    Preview {
        /// Bank statement (.pdf or .csv export)
        #[arg(long)]
        statement: PathBuf,

        /// Ledger (.xlsx/.xls/.ods or .csv) whose column names to list
        #[arg(long)]
        ledger: Option<PathBuf>,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Extract both sources and report statement movements missing from the ledger
    Reconcile {
        /// Bank statement (.pdf or .csv export)
        #[arg(long)]
        statement: PathBuf,

        /// Ledger (.xlsx/.xls/.ods or .csv)
        #[arg(long)]
        ledger: PathBuf,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a starter config (never overwrites)
    Init,
    /// Print the effective config
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// One signed amount column
    Single,
    /// Separate debit and credit columns
    Split,
}

impl From<ModeArg> for AmountMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Single => AmountMode::Single,
            ModeArg::Split => AmountMode::Split,
        }
    }
}

/// Per-run overrides of the config file.
#[derive(Args, Debug, Default)]
struct MappingArgs {
    /// Statement amount layout
    #[arg(long, value_enum)]
    amount_mode: Option<ModeArg>,

    /// Statement date column index
    #[arg(long)]
    date_col: Option<usize>,

    /// Statement description column index
    #[arg(long)]
    desc_col: Option<usize>,

    /// Statement amount column index (single mode)
    #[arg(long)]
    amount_col: Option<usize>,

    /// Statement debit/outflow column index (split mode)
    #[arg(long)]
    debit_col: Option<usize>,

    /// Statement credit/inflow column index (split mode)
    #[arg(long)]
    credit_col: Option<usize>,

    /// Delimiter of a CSV statement export
    #[arg(long)]
    statement_delimiter: Option<String>,

    /// Ledger date column name
    #[arg(long)]
    ledger_date: Option<String>,

    /// Ledger amount column name (net, or inflows with --ledger-debit)
    #[arg(long)]
    ledger_amount: Option<String>,

    /// Ledger outflow column name
    #[arg(long)]
    ledger_debit: Option<String>,

    /// Delimiter of a CSV ledger
    #[arg(long)]
    ledger_delimiter: Option<String>,

    /// Currency symbol for the total difference
    #[arg(long)]
    currency: Option<String>,
}

impl MappingArgs {
    fn apply(&self, cfg: &mut Config) {
        let st = &mut cfg.statement;
        if let Some(mode) = self.amount_mode {
            st.amount_mode = mode.into();
        }
        override_with(&mut st.date_column, self.date_col);
        override_with(&mut st.description_column, self.desc_col);
        override_with(&mut st.amount_column, self.amount_col);
        override_with(&mut st.debit_column, self.debit_col);
        override_with(&mut st.credit_column, self.credit_col);
        override_with(&mut st.csv_delimiter, self.statement_delimiter.clone());

        let ledger = &mut cfg.ledger;
        override_with(&mut ledger.date_column, self.ledger_date.clone());
        override_with(&mut ledger.amount_column, self.ledger_amount.clone());
        override_with(&mut ledger.debit_column, self.ledger_debit.clone());
        override_with(&mut ledger.csv_delimiter, self.ledger_delimiter.clone());

        if let Some(symbol) = &self.currency {
            cfg.report.currency_symbol = symbol.clone();
        }
    }
}

fn override_with<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Something went wrong: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(p) => Ok(p),
        None => state::default_config_path(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = config_path(cli.config)?;

    match cli.command {
        Command::Preview {
            statement,
            ledger,
            mapping,
        } => {
            let mut cfg = load_config(&path)?;
            mapping.apply(&mut cfg);

            let mut doc = open_statement(&statement, cfg.statement.read_options()?)?;
            let first = bankrec_core::preview(doc.as_mut())?;

            let ledger_table = match ledger {
                Some(p) => Some(
                    read_ledger(&p, cfg.ledger.read_options()?)
                        .with_context(|| format!("reading ledger {}", p.display()))?,
                ),
                None => None,
            };

            print!("{}", render::preview(&first, ledger_table.as_ref()));
            println!(
                "Configured:                {}",
                render::describe_mapping(&cfg.statement.mapping(first.width()))
            );
        }

        Command::Reconcile {
            statement,
            ledger,
            mapping,
            json,
        } => {
            let mut cfg = load_config(&path)?;
            mapping.apply(&mut cfg);

            let ledger_table = read_ledger(&ledger, cfg.ledger.read_options()?)
                .with_context(|| format!("reading ledger {}", ledger.display()))?;

            // Dropped at the end of this arm, on success or error.
            let mut doc = open_statement(&statement, cfg.statement.read_options()?)?;
            let first = bankrec_core::preview(doc.as_mut())?;

            let request = ReconciliationRequest {
                statement: cfg.statement.mapping(first.width()),
                ledger: cfg.ledger.mapping()?,
            };
            info!("statement mapping: {}", render::describe_mapping(&request.statement));

            let report = bankrec_core::run(&request, doc.as_mut(), &ledger_table)?;

            if json {
                println!("{}", render::report_json(&report, &cfg.report.currency_symbol)?);
            } else {
                print!("{}", render::report(&report, &cfg.report.currency_symbol));
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                if config::init_config(&path)? {
                    println!("Wrote {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigCommand::Show => {
                let cfg = load_config(&path)?;
                println!("# {}", path.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}
