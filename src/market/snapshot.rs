//! Offline quote snapshot provider
//!
//! Serves prices and call chains from a JSON file so analyses can be
//! replayed without network access.

use super::{MarketDataError, MarketDataProvider, OptionChain};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Quotes captured at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Latest close per ticker
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,
    /// Call chains, one entry per ticker and expiration
    #[serde(default)]
    pub chains: Vec<OptionChain>,
}

/// Market data provider backed by a [`QuoteSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: QuoteSnapshot,
}

impl SnapshotProvider {
    /// Create a provider from an in-memory snapshot
    pub fn new(snapshot: QuoteSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading quote snapshot {}", path.display()))?;
        let snapshot: QuoteSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("parsing quote snapshot {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            prices = snapshot.prices.len(),
            chains = snapshot.chains.len(),
            "Loaded quote snapshot"
        );

        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &QuoteSnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl MarketDataProvider for SnapshotProvider {
    async fn latest_close(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        self.snapshot
            .prices
            .get(ticker)
            .copied()
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| MarketDataError::NoPrice(ticker.to_string()))
    }

    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
        let mut dates: Vec<NaiveDate> = self
            .snapshot
            .chains
            .iter()
            .filter(|c| c.ticker == ticker)
            .map(|c| c.expiration)
            .collect();
        dates.sort();
        dates.dedup();

        if dates.is_empty() {
            return Err(MarketDataError::NoExpirations(ticker.to_string()));
        }
        Ok(dates)
    }

    async fn call_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, MarketDataError> {
        self.snapshot
            .chains
            .iter()
            .find(|c| c.ticker == ticker && c.expiration == expiration && !c.calls.is_empty())
            .cloned()
            .ok_or_else(|| MarketDataError::NoQuotes {
                ticker: ticker.to_string(),
                expiration,
            })
    }
}
