//! CLI interface for rate-hedge
//!
//! Provides subcommands for:
//! - `analyze`: Hedge, strategy and income analysis from an input file
//! - `quote`: Spot price and nearest call for one ticker
//! - `log`: Record a daily rate observation
//! - `history`: Summarize rate logs or build a swap spread series
//! - `config`: Show configuration

mod analyze;
mod history;
mod log;
mod quote;

pub use analyze::AnalyzeArgs;
pub use history::{HistoryArgs, HistoryCommand, SwapHistoryArgs};
pub use log::{LogArgs, LogCommand, PolicyLogArgs, SwapLogArgs};
pub use quote::QuoteArgs;

use crate::config::Config;
use crate::market::{create_provider, MarketDataProvider, SnapshotProvider};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rate-hedge")]
#[command(about = "Bond ETF exposure, call hedge sizing and rate spread logging")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Read quotes from a JSON snapshot instead of the configured provider
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full analysis
    Analyze(AnalyzeArgs),
    /// Look up a spot price and call chain
    Quote(QuoteArgs),
    /// Record a rate observation
    Log(LogArgs),
    /// Inspect rate history
    History(HistoryArgs),
    /// Show configuration
    Config,
}

/// Output format for report-style commands
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Provider for this invocation, the snapshot flag taking precedence
pub fn market_provider(
    config: &Config,
    snapshot: Option<&Path>,
) -> anyhow::Result<Box<dyn MarketDataProvider>> {
    match snapshot {
        Some(path) => Ok(Box::new(SnapshotProvider::load(path)?)),
        None => create_provider(&config.provider),
    }
}

/// Today in local time unless overridden
pub fn today_or(date: Option<chrono::NaiveDate>) -> chrono::NaiveDate {
    crate::ratelog::observation_date(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_log_swap() {
        let cli = Cli::try_parse_from([
            "rate-hedge", "log", "swap", "--sofr", "4.30", "--treasury", "4.90", "--date", "2025-06-20",
        ])
        .unwrap();
        let Commands::Log(LogArgs { command: LogCommand::Swap(args) }) = cli.command else {
            panic!("expected log swap");
        };
        assert_eq!(args.sofr, rust_decimal_macros::dec!(4.30));
        assert_eq!(args.date, chrono::NaiveDate::from_ymd_opt(2025, 6, 20));
    }

    #[test]
    fn test_parse_history_swap_defaults() {
        let cli = Cli::try_parse_from([
            "rate-hedge", "history", "swap", "--swap-csv", "swap.csv", "--yield-csv", "yield.csv",
        ])
        .unwrap();
        let Commands::History(HistoryArgs { command: HistoryCommand::Swap(args) }) = cli.command else {
            panic!("expected history swap");
        };
        assert_eq!(args.range, crate::ratelog::TimeRange::Year);
        assert_eq!(args.ma, vec![7, 30, 60, 90]);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_analyze_with_snapshot() {
        let cli = Cli::try_parse_from([
            "rate-hedge", "analyze", "--input", "analysis.toml", "--format", "json", "--snapshot", "quotes.json",
        ])
        .unwrap();
        assert_eq!(cli.snapshot, Some(PathBuf::from("quotes.json")));
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }
}
