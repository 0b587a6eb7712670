//! Market data module
//!
//! Spot prices and call-option chains from an external quote provider

mod snapshot;
mod types;
mod yahoo;

pub use snapshot::{QuoteSnapshot, SnapshotProvider};
pub use types::{MarketDataError, OptionChain, OptionQuote, CONTRACT_MULTIPLIER};
pub use yahoo::{YahooClient, YahooConfig};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{ProviderConfig, ProviderKind};

/// Trait for market data provider implementations
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest close price for a ticker
    async fn latest_close(&self, ticker: &str) -> Result<Decimal, MarketDataError>;
    /// Listed option expirations for a ticker, nearest first
    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, MarketDataError>;
    /// Call quotes for one expiration, in provider order
    async fn call_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, MarketDataError>;
}

/// Build the provider named by configuration
pub fn create_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn MarketDataProvider>> {
    match config.kind {
        ProviderKind::Yahoo => Ok(Box::new(YahooClient::with_config(YahooConfig::from(
            config,
        ))?)),
        ProviderKind::Snapshot => {
            let path = config
                .snapshot_path
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("provider.snapshot_path is required for snapshot provider"))?;
            Ok(Box::new(SnapshotProvider::load(path)?))
        }
    }
}
