//! Market data types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shares controlled by one listed option contract
pub const CONTRACT_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// A single call-option quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike: Decimal,
    /// Best bid
    pub bid: Decimal,
    /// Best ask
    pub ask: Decimal,
    /// Session volume, absent when the provider reports none
    #[serde(default)]
    pub volume: Option<u64>,
    /// Open interest
    #[serde(default)]
    pub open_interest: Option<u64>,
    /// Option delta, rarely supplied by retail providers
    #[serde(default)]
    pub delta: Option<Decimal>,
}

impl OptionQuote {
    /// One-line description used in tables and notices
    pub fn describe(&self) -> String {
        format!(
            "Strike: ${:.2} | Bid: ${:.2} | Ask: ${:.2} | Volume: {} | OI: {}",
            self.strike,
            self.bid,
            self.ask,
            fmt_count(self.volume),
            fmt_count(self.open_interest),
        )
    }
}

fn fmt_count(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Call quotes for one ticker and expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub ticker: String,
    pub expiration: NaiveDate,
    pub calls: Vec<OptionQuote>,
}

impl OptionChain {
    /// Days from `today` until expiration
    pub fn days_to_expiration(&self, today: NaiveDate) -> i64 {
        (self.expiration - today).num_days()
    }
}

/// Market data errors
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// No close price available
    #[error("No price data for {0}")]
    NoPrice(String),
    /// No listed expirations
    #[error("No options data found for {0}")]
    NoExpirations(String),
    /// Chain for the expiration carries no calls
    #[error("No call options found for {ticker} on {expiration}")]
    NoQuotes { ticker: String, expiration: NaiveDate },
    /// Non-success HTTP status
    #[error("Quote API error: {status} - {body}")]
    Api { status: u16, body: String },
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Unexpected payload
    #[error("Malformed quote data: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote() -> OptionQuote {
        OptionQuote {
            strike: dec!(90),
            bid: dec!(4.5),
            ask: dec!(4.75),
            volume: Some(120),
            open_interest: None,
            delta: None,
        }
    }

    #[test]
    fn test_describe_quote() {
        assert_eq!(
            quote().describe(),
            "Strike: $90.00 | Bid: $4.50 | Ask: $4.75 | Volume: 120 | OI: -"
        );
    }

    #[test]
    fn test_days_to_expiration() {
        let chain = OptionChain {
            ticker: "TLT".to_string(),
            expiration: NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            calls: vec![quote()],
        };
        let today = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        assert_eq!(chain.days_to_expiration(today), 30);
    }

    #[test]
    fn test_quote_deserialize_optional_fields() {
        let json = r#"{"strike": 100, "bid": 1.25, "ask": 1.4}"#;
        let quote: OptionQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.strike, dec!(100));
        assert!(quote.volume.is_none());
        assert!(quote.delta.is_none());
    }

    #[test]
    fn test_error_messages() {
        let err = MarketDataError::NoQuotes {
            ticker: "EDV".to_string(),
            expiration: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
        };
        assert_eq!(err.to_string(), "No call options found for EDV on 2025-06-20");
        assert_eq!(
            MarketDataError::NoExpirations("TLT".to_string()).to_string(),
            "No options data found for TLT"
        );
    }
}
