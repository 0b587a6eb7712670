//! Analysis input document

use super::AnalysisError;
use crate::options::EntryMode;
use crate::strategy::Strategy;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Most strategies compared in one run
pub const MAX_STRATEGIES: usize = 5;

/// Largest share count, dollar value, strike or premium accepted
fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000u64)
}

/// Smallest delta accepted; contracts needed divide by it
fn min_delta() -> Decimal {
    Decimal::new(1, 3)
}

/// Bound on multiples and percentages entered by the operator
fn max_factor() -> Decimal {
    Decimal::from(1000)
}

/// Everything the operator supplies for one analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub reference: ReferenceInput,
    #[serde(default)]
    pub holdings: Vec<HoldingInput>,
    #[serde(default)]
    pub buy: BuyInput,
    #[serde(default)]
    pub safe_calls: SafeCallsInput,
    #[serde(default)]
    pub sell: SellInput,
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    #[serde(default)]
    pub projection: ProjectionInput,
}

/// The leveraged reference position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceInput {
    /// Overrides `hedge.reference_ticker`
    pub ticker: Option<String>,
    #[serde(default = "default_reference_shares")]
    pub shares: Decimal,
}

fn default_reference_shares() -> Decimal {
    Decimal::from(7270)
}

impl Default for ReferenceInput {
    fn default() -> Self {
        Self {
            ticker: None,
            shares: default_reference_shares(),
        }
    }
}

/// An ETF holding entered by dollar value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingInput {
    pub ticker: String,
    pub value: Decimal,
    /// Overrides the configured multiple for this ticker
    pub multiple: Option<Decimal>,
}

/// Bought call legs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyInput {
    /// Strike offset of the first leg, percent from spot
    #[serde(default = "default_buy_offset")]
    pub offset_pct: Decimal,
    /// Later legs use the first leg's offset times this
    #[serde(default = "default_offset_multiple")]
    pub offset_multiple: Decimal,
    #[serde(default)]
    pub legs: Vec<CallLegInput>,
}

fn default_buy_offset() -> Decimal {
    Decimal::from(-10)
}
fn default_offset_multiple() -> Decimal {
    Decimal::new(13, 1)
}

impl Default for BuyInput {
    fn default() -> Self {
        Self {
            offset_pct: default_buy_offset(),
            offset_multiple: default_offset_multiple(),
            legs: Vec::new(),
        }
    }
}

/// One bought call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLegInput {
    pub ticker: String,
    #[serde(default)]
    pub mode: EntryMode,
    /// Explicit offset for this leg instead of the derived one
    pub offset_pct: Option<Decimal>,
    /// Manual: the strike. Automatic: pick the quote nearest this strike.
    pub strike: Option<Decimal>,
    /// Manual premium per share
    pub bid: Option<Decimal>,
    /// Manual delta, or the fallback when the provider has none
    pub delta: Option<Decimal>,
    pub expiration: Option<NaiveDate>,
}

/// Safe short-call screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafeCallsInput {
    #[serde(default)]
    pub enabled: bool,
    /// Short-call expiration; the first listed when absent
    pub expiration: Option<NaiveDate>,
}

/// Calls sold against the strategies' holdings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellInput {
    #[serde(default = "default_sell_offset")]
    pub offset_pct: Decimal,
    #[serde(default = "default_offset_multiple")]
    pub strike_multiple: Decimal,
    #[serde(default)]
    pub legs: Vec<SellLegInput>,
}

fn default_sell_offset() -> Decimal {
    Decimal::from(5)
}

impl Default for SellInput {
    fn default() -> Self {
        Self {
            offset_pct: default_sell_offset(),
            strike_multiple: default_offset_multiple(),
            legs: Vec::new(),
        }
    }
}

/// One sold call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellLegInput {
    pub ticker: String,
    #[serde(default)]
    pub dividend_yield_pct: Decimal,
    pub expiration: Option<NaiveDate>,
}

/// Expected move used for return projections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    #[serde(default = "default_upside")]
    pub upside_pct: Decimal,
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_upside() -> Decimal {
    Decimal::from(10)
}
fn default_months() -> u32 {
    12
}

impl Default for ProjectionInput {
    fn default() -> Self {
        Self {
            upside_pct: default_upside(),
            months: default_months(),
        }
    }
}

impl AnalysisInput {
    /// Load an input document from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading analysis input {}", path.display()))?;
        let input: AnalysisInput = toml::from_str(&content)
            .with_context(|| format!("parsing analysis input {}", path.display()))?;
        Ok(input)
    }

    /// Reject inputs no computation can use
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: String| Err(AnalysisError::InvalidInput(msg));

        let amount = |v: Decimal| (Decimal::ZERO..=max_amount()).contains(&v);
        let factor = |v: Decimal| v.abs() <= max_factor();

        if self.reference.shares <= Decimal::ZERO {
            return invalid("reference shares must be positive".to_string());
        }
        if !amount(self.reference.shares) {
            return invalid(format!("reference shares must not exceed {}", max_amount()));
        }
        if let Some(h) = self.holdings.iter().find(|h| h.value < Decimal::ZERO) {
            return invalid(format!("holding {} has a negative value", h.ticker));
        }
        if let Some(h) = self.holdings.iter().find(|h| !amount(h.value)) {
            return invalid(format!("holding {} value must not exceed {}", h.ticker, max_amount()));
        }
        if let Some(h) = self
            .holdings
            .iter()
            .find(|h| h.multiple.is_some_and(|m| m <= Decimal::ZERO || !factor(m)))
        {
            return invalid(format!(
                "holding {} needs a multiple in (0, {}]",
                h.ticker,
                max_factor()
            ));
        }

        if !factor(self.buy.offset_pct) || !factor(self.buy.offset_multiple) {
            return invalid("buy offset and multiple must be within -1000..1000".to_string());
        }
        for leg in &self.buy.legs {
            if leg.mode == EntryMode::Manual && (leg.strike.is_none() || leg.bid.is_none()) {
                return invalid(format!("manual leg {} needs strike and bid", leg.ticker));
            }
            if [leg.strike, leg.bid].into_iter().flatten().any(|v| !amount(v)) {
                return invalid(format!(
                    "strike and bid for {} must be within 0..{}",
                    leg.ticker,
                    max_amount()
                ));
            }
            if leg.offset_pct.is_some_and(|o| !factor(o)) {
                return invalid(format!("offset for {} must be within -1000..1000", leg.ticker));
            }
            if leg.delta.is_some_and(|d| d < min_delta() || d > Decimal::ONE) {
                return invalid(format!(
                    "delta for {} must be in [{}, 1]",
                    leg.ticker,
                    min_delta()
                ));
            }
        }

        if !factor(self.sell.offset_pct) || !factor(self.sell.strike_multiple) {
            return invalid("sell offset and multiple must be within -1000..1000".to_string());
        }
        if let Some(leg) = self
            .sell
            .legs
            .iter()
            .find(|l| !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&l.dividend_yield_pct))
        {
            return invalid(format!("dividend yield for {} must be within 0..100", leg.ticker));
        }

        let split_pct = |v: Decimal| (Decimal::ZERO..=max_factor()).contains(&v);
        for strategy in &self.strategies {
            if let Some(split) = strategy
                .splits
                .iter()
                .find(|x| !split_pct(x.shares_pct) || !split_pct(x.calls_pct))
            {
                return invalid(format!(
                    "{}: percentages for {} must be within 0..{}",
                    strategy.name,
                    split.ticker,
                    max_factor()
                ));
            }
        }

        if self.strategies.len() > MAX_STRATEGIES {
            return invalid(format!("at most {MAX_STRATEGIES} strategies can be compared"));
        }
        if !(Decimal::from(-500)..=Decimal::from(500)).contains(&self.projection.upside_pct) {
            return invalid("upside_pct must be within -500..500".to_string());
        }
        if !(1..=60).contains(&self.projection.months) {
            return invalid("months must be within 1..60".to_string());
        }
        Ok(())
    }

    /// Reference ticker, falling back to the configured one
    pub fn reference_ticker<'a>(&'a self, configured: &'a str) -> &'a str {
        self.reference.ticker.as_deref().unwrap_or(configured)
    }

    /// Every ticker whose latest close the analysis needs
    pub fn priced_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = Vec::new();
        let names = self
            .holdings
            .iter()
            .map(|h| &h.ticker)
            .chain(self.buy.legs.iter().map(|l| &l.ticker))
            .chain(self.strategies.iter().flat_map(|s| s.splits.iter().map(|x| &x.ticker)));
        for name in names {
            if !tickers.contains(name) {
                tickers.push(name.clone());
            }
        }
        tickers
    }
}
