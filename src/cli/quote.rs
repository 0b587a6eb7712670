//! Quote command implementation

use super::{market_provider, today_or};
use crate::config::Config;
use crate::options::{clamp_offset, default_expiration, nearest_strike, target_price};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::path::Path;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Ticker symbol
    pub ticker: String,

    /// Option expiration (defaults to the first at least min DTE out)
    #[arg(long)]
    pub expiration: Option<NaiveDate>,

    /// Target strike as percent from spot
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub offset: Decimal,

    /// Quotes shown on each side of the nearest strike
    #[arg(long, default_value = "3")]
    pub width: usize,
}

impl QuoteArgs {
    pub async fn execute(&self, config: &Config, snapshot: Option<&Path>) -> anyhow::Result<()> {
        let provider = market_provider(config, snapshot)?;
        let ticker = self.ticker.to_uppercase();
        let today = today_or(None);

        let spot = provider.latest_close(&ticker).await?;
        println!("{ticker} latest close: ${spot:.2}");

        let expiration = match self.expiration {
            Some(date) => date,
            None => {
                let listed = provider.expirations(&ticker).await?;
                default_expiration(&listed, today, config.hedge.min_days_to_expiration)
                    .ok_or_else(|| anyhow::anyhow!("no expirations listed for {ticker}"))?
            }
        };

        let chain = provider.call_chain(&ticker, expiration).await?;
        let offset = clamp_offset(self.offset, config.hedge.buy_offset_bound_pct);
        let target = target_price(spot, offset);
        println!(
            "Expiration {} ({} DTE), target {:+.2}% -> ${:.2}",
            expiration,
            chain.days_to_expiration(today),
            offset,
            target
        );

        let Some(nearest) = nearest_strike(&chain.calls, target) else {
            anyhow::bail!("no call quotes for {ticker} on {expiration}");
        };
        let index = chain
            .calls
            .iter()
            .position(|q| q.strike == nearest.strike)
            .unwrap_or(0);
        let start = index.saturating_sub(self.width);
        let end = (index + self.width + 1).min(chain.calls.len());

        for quote in &chain.calls[start..end] {
            let marker = if quote.strike == nearest.strike { ">" } else { " " };
            let delta = quote
                .delta
                .map(|d| format!(" | Delta: {d:.2}"))
                .unwrap_or_default();
            println!("{marker} {}{delta}", quote.describe());
        }
        Ok(())
    }
}
