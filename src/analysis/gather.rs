//! Market data collection for an analysis

use super::{AnalysisError, AnalysisInput};
use crate::config::HedgeConfig;
use crate::market::{MarketDataError, MarketDataProvider, OptionChain};
use crate::options::{default_expiration, EntryMode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quotes fetched for one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Latest close per ticker
    pub prices: BTreeMap<String, Decimal>,
    /// Chains backing automatic bought legs, by index into `buy.legs`
    pub buy_chains: BTreeMap<usize, OptionChain>,
    /// Short-call chains for the safe-call screen, by index into `buy.legs`
    pub safe_chains: BTreeMap<usize, OptionChain>,
    /// Chains for sold calls, by index into `sell.legs`
    pub sell_chains: BTreeMap<usize, OptionChain>,
    /// Optional sections that could not be fetched
    pub notices: Vec<String>,
}

impl MarketSnapshot {
    pub fn price(&self, ticker: &str) -> Result<Decimal, AnalysisError> {
        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| AnalysisError::MissingPrice(ticker.to_string()))
    }
}

/// Chain for `expiration`, or for the expiration `pick` chooses
async fn fetch_chain(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    expiration: Option<NaiveDate>,
    pick: impl Fn(&[NaiveDate]) -> Option<NaiveDate>,
) -> Result<OptionChain, MarketDataError> {
    let expiration = match expiration {
        Some(date) => date,
        None => {
            let listed = provider.expirations(ticker).await?;
            pick(&listed).ok_or_else(|| MarketDataError::NoExpirations(ticker.to_string()))?
        }
    };
    provider.call_chain(ticker, expiration).await
}

/// Fetch everything `input` needs
///
/// Reference, holding and bought-leg data is required. Safe-call and
/// sold-call chains are optional and leave a notice when missing.
pub async fn gather(
    provider: &dyn MarketDataProvider,
    input: &AnalysisInput,
    hedge: &HedgeConfig,
    today: NaiveDate,
) -> Result<MarketSnapshot, AnalysisError> {
    let mut snapshot = MarketSnapshot::default();
    let min_dte = hedge.min_days_to_expiration;
    let default_pick = |listed: &[NaiveDate]| default_expiration(listed, today, min_dte);

    let reference = input.reference_ticker(&hedge.reference_ticker).to_string();
    let mut required = vec![reference];
    required.extend(input.priced_tickers());

    for ticker in required {
        if snapshot.prices.contains_key(&ticker) {
            continue;
        }
        let price = provider
            .latest_close(&ticker)
            .await
            .map_err(|e| AnalysisError::market_data(&ticker, e))?;
        snapshot.prices.insert(ticker, price);
    }

    for (i, leg) in input.buy.legs.iter().enumerate() {
        if leg.mode != EntryMode::Automatic {
            continue;
        }
        let chain = fetch_chain(provider, &leg.ticker, leg.expiration, default_pick)
            .await
            .map_err(|e| AnalysisError::market_data(&leg.ticker, e))?;
        snapshot.buy_chains.insert(i, chain);
    }

    if input.safe_calls.enabled {
        for (i, leg) in input.buy.legs.iter().enumerate() {
            let first_listed = |listed: &[NaiveDate]| listed.first().copied();
            match fetch_chain(provider, &leg.ticker, input.safe_calls.expiration, first_listed).await {
                Ok(chain) => {
                    snapshot.safe_chains.insert(i, chain);
                }
                Err(e) => {
                    tracing::warn!(ticker = %leg.ticker, error = %e, "Safe-call chain unavailable");
                    snapshot
                        .notices
                        .push(format!("Safe short calls for {} skipped: {}", leg.ticker, e));
                }
            }
        }
    }

    for (i, leg) in input.sell.legs.iter().enumerate() {
        if !snapshot.prices.contains_key(&leg.ticker) {
            match provider.latest_close(&leg.ticker).await {
                Ok(price) => {
                    snapshot.prices.insert(leg.ticker.clone(), price);
                }
                Err(e) => {
                    tracing::warn!(ticker = %leg.ticker, error = %e, "Sell-leg price unavailable");
                    snapshot
                        .notices
                        .push(format!("Call to sell for {} skipped: {}", leg.ticker, e));
                    continue;
                }
            }
        }

        match fetch_chain(provider, &leg.ticker, leg.expiration, default_pick).await {
            Ok(chain) => {
                snapshot.sell_chains.insert(i, chain);
            }
            Err(e) => {
                tracing::warn!(ticker = %leg.ticker, error = %e, "Sell-leg chain unavailable");
                snapshot
                    .notices
                    .push(format!("Call to sell for {} skipped: {}", leg.ticker, e));
            }
        }
    }

    tracing::info!(
        prices = snapshot.prices.len(),
        buy_chains = snapshot.buy_chains.len(),
        safe_chains = snapshot.safe_chains.len(),
        sell_chains = snapshot.sell_chains.len(),
        "Market data gathered"
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CallLegInput, HoldingInput, SellLegInput};
    use crate::market::{OptionQuote, QuoteSnapshot, SnapshotProvider};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chain(ticker: &str, expiration: NaiveDate) -> OptionChain {
        OptionChain {
            ticker: ticker.to_string(),
            expiration,
            calls: vec![OptionQuote {
                strike: dec!(80),
                bid: dec!(7.1),
                ask: dec!(7.3),
                volume: None,
                open_interest: None,
                delta: Some(dec!(0.8)),
            }],
        }
    }

    fn provider() -> SnapshotProvider {
        SnapshotProvider::new(QuoteSnapshot {
            prices: BTreeMap::from([
                ("TMF".to_string(), dec!(40)),
                ("TLT".to_string(), dec!(86)),
            ]),
            chains: vec![
                chain("TLT", date(2025, 6, 27)),
                chain("TLT", date(2025, 8, 15)),
            ],
        })
    }

    fn input() -> AnalysisInput {
        let mut input = AnalysisInput::default();
        input.holdings.push(HoldingInput {
            ticker: "TLT".to_string(),
            value: dec!(100000),
            multiple: None,
        });
        input.buy.legs.push(CallLegInput {
            ticker: "TLT".to_string(),
            mode: EntryMode::Automatic,
            offset_pct: None,
            strike: None,
            bid: None,
            delta: None,
            expiration: None,
        });
        input
    }

    #[tokio::test]
    async fn test_gather_required_data() {
        let today = date(2025, 6, 20);
        let snapshot = gather(&provider(), &input(), &HedgeConfig::default(), today)
            .await
            .unwrap();

        assert_eq!(snapshot.price("TMF").unwrap(), dec!(40));
        assert_eq!(snapshot.price("TLT").unwrap(), dec!(86));
        // 06-27 is 7 days out; 08-15 is the first at least 30 days out
        assert_eq!(snapshot.buy_chains[&0].expiration, date(2025, 8, 15));
        assert!(snapshot.notices.is_empty());
    }

    #[tokio::test]
    async fn test_missing_holding_price_aborts() {
        let mut input = input();
        input.holdings.push(HoldingInput {
            ticker: "EDV".to_string(),
            value: dec!(50000),
            multiple: None,
        });

        let result = gather(&provider(), &input, &HedgeConfig::default(), date(2025, 6, 20)).await;
        assert!(matches!(result, Err(AnalysisError::MarketData { ref ticker, .. }) if ticker == "EDV"));
    }

    #[tokio::test]
    async fn test_optional_sections_leave_notices() {
        let mut input = input();
        input.safe_calls.enabled = true;
        input.safe_calls.expiration = Some(date(2025, 7, 18));
        input.sell.legs.push(SellLegInput {
            ticker: "EDV".to_string(),
            dividend_yield_pct: dec!(4.9),
            expiration: None,
        });

        let snapshot = gather(&provider(), &input, &HedgeConfig::default(), date(2025, 6, 20))
            .await
            .unwrap();

        assert!(snapshot.safe_chains.is_empty());
        assert!(snapshot.sell_chains.is_empty());
        assert_eq!(snapshot.notices.len(), 2);
        assert!(snapshot.notices[1].contains("EDV"));
    }

    #[tokio::test]
    async fn test_safe_chain_defaults_to_first_listed() {
        let mut input = input();
        input.safe_calls.enabled = true;

        let snapshot = gather(&provider(), &input, &HedgeConfig::default(), date(2025, 6, 20))
            .await
            .unwrap();
        assert_eq!(snapshot.safe_chains[&0].expiration, date(2025, 6, 27));
    }

    #[tokio::test]
    async fn test_same_ticker_legs_keep_their_own_chains() {
        let mut input = input();
        input.buy.legs[0].expiration = Some(date(2025, 6, 27));
        input.buy.legs.push(CallLegInput {
            ticker: "TLT".to_string(),
            mode: EntryMode::Automatic,
            offset_pct: None,
            strike: None,
            bid: None,
            delta: None,
            expiration: None,
        });

        let snapshot = gather(&provider(), &input, &HedgeConfig::default(), date(2025, 6, 20))
            .await
            .unwrap();
        assert_eq!(snapshot.buy_chains.len(), 2);
        assert_eq!(snapshot.buy_chains[&0].expiration, date(2025, 6, 27));
        assert_eq!(snapshot.buy_chains[&1].expiration, date(2025, 8, 15));
    }
}
