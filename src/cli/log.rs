//! Log command implementation

use super::today_or;
use crate::config::Config;
use crate::ratelog::{CountryRates, PolicySpreadObservation, RateLog, SwapSpreadObservation};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommand,
}

#[derive(Subcommand, Debug)]
pub enum LogCommand {
    /// 30Y SOFR swap rate against the 30Y Treasury yield
    Swap(SwapLogArgs),
    /// 30Y yields against policy rates for the US, Germany and Japan
    Policy(PolicyLogArgs),
}

#[derive(Args, Debug)]
pub struct SwapLogArgs {
    /// 30Y SOFR swap rate (%)
    #[arg(long)]
    pub sofr: Decimal,

    /// 30Y Treasury yield (%)
    #[arg(long)]
    pub treasury: Decimal,

    /// Observation date (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct PolicyLogArgs {
    /// US 30Y Treasury yield (%)
    #[arg(long)]
    pub us_yield: Decimal,
    /// Fed funds rate (%)
    #[arg(long)]
    pub us_policy: Decimal,
    /// Germany 30Y Bund yield (%)
    #[arg(long)]
    pub germany_yield: Decimal,
    /// ECB main refinancing rate (%)
    #[arg(long)]
    pub germany_policy: Decimal,
    /// Japan 30Y JGB yield (%)
    #[arg(long)]
    pub japan_yield: Decimal,
    /// BoJ policy rate (%)
    #[arg(long)]
    pub japan_policy: Decimal,

    /// Observation date (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

fn ensure_non_negative(values: &[(&str, Decimal)]) -> anyhow::Result<()> {
    if let Some((name, value)) = values.iter().find(|(_, v)| v.is_sign_negative()) {
        anyhow::bail!("{name} must not be negative (got {value})");
    }
    Ok(())
}

impl LogArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        match &self.command {
            LogCommand::Swap(args) => {
                ensure_non_negative(&[("sofr", args.sofr), ("treasury", args.treasury)])?;
                let observation =
                    SwapSpreadObservation::new(today_or(args.date), args.sofr, args.treasury);
                let log = RateLog::new(config.rate_log.swap_spread_path());
                let rows = log.upsert(observation.clone())?;

                println!(
                    "{}: SOFR swap {:.2}% - Treasury {:.2}% = spread {:+.2}%",
                    observation.date,
                    observation.sofr_swap,
                    observation.treasury_yield,
                    observation.spread
                );
                println!("Saved to {} ({} rows)", log.path().display(), rows.len());
            }
            LogCommand::Policy(args) => {
                ensure_non_negative(&[
                    ("us-yield", args.us_yield),
                    ("us-policy", args.us_policy),
                    ("germany-yield", args.germany_yield),
                    ("germany-policy", args.germany_policy),
                    ("japan-yield", args.japan_yield),
                    ("japan-policy", args.japan_policy),
                ])?;
                let observation = PolicySpreadObservation::new(
                    today_or(args.date),
                    CountryRates {
                        yield_30y: args.us_yield,
                        policy_rate: args.us_policy,
                    },
                    CountryRates {
                        yield_30y: args.germany_yield,
                        policy_rate: args.germany_policy,
                    },
                    CountryRates {
                        yield_30y: args.japan_yield,
                        policy_rate: args.japan_policy,
                    },
                );
                let log = RateLog::new(config.rate_log.policy_spread_path());
                let rows = log.upsert(observation.clone())?;

                println!("{}: 30Y yield minus policy rate", observation.date);
                println!("  US:      {:+.2}%", observation.us_spread);
                println!("  Germany: {:+.2}%", observation.germany_spread);
                println!("  Japan:   {:+.2}%", observation.japan_spread);
                println!("Saved to {} ({} rows)", log.path().display(), rows.len());
            }
        }
        Ok(())
    }
}
