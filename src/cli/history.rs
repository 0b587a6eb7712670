//! History command implementation

use super::OutputFormat;
use crate::config::Config;
use crate::ratelog::{
    build_history, latest_logged_date, load_price_series, write_history_csv,
    PolicySpreadObservation, RateLog, SwapSpreadObservation, TimeRange,
};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Row counts and date spans of the rate logs
    Logs,
    /// Swap spread series from two price history files
    Swap(SwapHistoryArgs),
}

#[derive(Args, Debug)]
pub struct SwapHistoryArgs {
    /// Swap rate history (Date,Price)
    #[arg(long)]
    pub swap_csv: PathBuf,

    /// 30Y yield history (Date,Price)
    #[arg(long)]
    pub yield_csv: PathBuf,

    /// Lookback: 7D, 1M, 3M, 6M, 1Y, 2Y, 3Y, 5Y or All
    #[arg(long, default_value = "1Y")]
    pub range: TimeRange,

    /// Moving average windows in trading days
    #[arg(long, value_delimiter = ',', default_values_t = [7usize, 30, 60, 90])]
    pub ma: Vec<usize>,

    /// Write the series to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Rows shown in table output
    #[arg(long, default_value = "10")]
    pub tail: usize,
}

impl HistoryArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        match &self.command {
            HistoryCommand::Logs => show_logs(config),
            HistoryCommand::Swap(args) => args.execute(),
        }
    }
}

fn show_logs(config: &Config) -> anyhow::Result<()> {
    let summaries = [
        RateLog::<SwapSpreadObservation>::new(config.rate_log.swap_spread_path()).summary()?,
        RateLog::<PolicySpreadObservation>::new(config.rate_log.policy_spread_path()).summary()?,
    ];

    for s in &summaries {
        let span = match (s.first, s.last) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "empty".to_string(),
        };
        println!("{:<14} {:>5} points  {}  ({})", s.name, s.points, span, s.path.display());
    }

    match latest_logged_date(&config.rate_log)? {
        Some(date) => println!("Latest observation: {date}"),
        None => println!("No observations logged yet"),
    }
    Ok(())
}

impl SwapHistoryArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        let swap = load_price_series(&self.swap_csv)?;
        let yields = load_price_series(&self.yield_csv)?;
        let history = build_history(&swap, &yields, self.range, &self.ma);

        if history.points.is_empty() {
            anyhow::bail!(
                "no overlapping dates between {} and {}",
                self.swap_csv.display(),
                self.yield_csv.display()
            );
        }

        if let Some(path) = &self.output {
            write_history_csv(&history, path)?;
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
            OutputFormat::Table => {
                println!(
                    "Swap spread history ({}, {} points)",
                    history.range,
                    history.points.len()
                );
                let start = history.points.len().saturating_sub(self.tail);
                print!("{:<10} {:>8} {:>8} {:>8}", "Date", "Swap", "Yield", "Spread");
                for ma in &history.moving_averages {
                    print!(" {:>9}", format!("Sprd MA{}", ma.window));
                }
                println!();
                for (i, p) in history.points.iter().enumerate().skip(start) {
                    print!(
                        "{:<10} {:>8.4} {:>8.4} {:>8.4}",
                        p.date, p.swap, p.yield_30y, p.spread
                    );
                    for ma in &history.moving_averages {
                        print!(" {:>9.4}", ma.spread_ma[i]);
                    }
                    println!();
                }
            }
        }
        Ok(())
    }
}
