//! Analysis error types

use crate::market::MarketDataError;
use thiserror::Error;

/// Conditions that stop an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Required market data could not be fetched
    #[error("market data unavailable for {ticker}: {source}")]
    MarketData {
        ticker: String,
        #[source]
        source: MarketDataError,
    },

    /// A price the computation depends on is missing from the snapshot
    #[error("no price for {0}")]
    MissingPrice(String),

    /// An automatic call leg has no chain to choose from
    #[error("no option quotes for {0}")]
    MissingChain(String),

    /// Input rejected before any data is fetched
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    pub fn market_data(ticker: &str, source: MarketDataError) -> Self {
        Self::MarketData {
            ticker: ticker.to_string(),
            source,
        }
    }
}
