//! Analyze command implementation

use super::{market_provider, today_or, OutputFormat};
use crate::analysis::{run_analysis, AnalysisInput};
use crate::config::Config;
use chrono::NaiveDate;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Analysis input file (TOML)
    #[arg(short, long, default_value = "analysis.toml")]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Date used for days-to-expiration (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config, snapshot: Option<&Path>) -> anyhow::Result<()> {
        let input = AnalysisInput::load(&self.input)?;
        let provider = market_provider(config, snapshot)?;
        let today = today_or(self.as_of);

        tracing::info!(input = %self.input.display(), %today, "Running analysis");
        let report = run_analysis(provider.as_ref(), &input, &config.hedge, today).await?;

        match self.format {
            OutputFormat::Table => println!("{}", report.format_table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}
