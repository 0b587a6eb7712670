//! Yahoo Finance quote client
//!
//! Reads the latest daily close from the v8 chart endpoint and call chains
//! from the v7 options endpoint. Expirations are reported by the API as
//! unix timestamps at midnight UTC of the expiry date.

use super::{MarketDataError, MarketDataProvider, OptionChain, OptionQuote};
use crate::config::ProviderConfig;
use crate::telemetry::{record_provider_request, ProviderOp};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Default chart endpoint
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
/// Default options endpoint
pub const YAHOO_OPTIONS_URL: &str = "https://query2.finance.yahoo.com/v7/finance/options";

const USER_AGENT: &str = concat!("rate-hedge/", env!("CARGO_PKG_VERSION"));

/// Configuration for the Yahoo client
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Chart endpoint base URL
    pub chart_url: String,
    /// Options endpoint base URL
    pub options_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_url: YAHOO_CHART_URL.to_string(),
            options_url: YAHOO_OPTIONS_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ProviderConfig> for YahooConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            chart_url: config.chart_url.clone(),
            options_url: config.options_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Client for Yahoo Finance quote endpoints
pub struct YahooClient {
    config: YahooConfig,
    client: Client,
}

impl YahooClient {
    /// Create a new client with default configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: YahooConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        tracing::debug!(url = %url, ?query, "Requesting quote data");

        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn fetch_latest_close(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        let url = format!("{}/{}", self.config.chart_url, ticker);
        let query = [
            ("range", "5d".to_string()),
            ("interval", "1d".to_string()),
        ];
        let response: ChartResponse = self.get_json(&url, &query).await?;
        parse_latest_close(ticker, response)
    }

    async fn fetch_options(
        &self,
        ticker: &str,
        expiration: Option<NaiveDate>,
    ) -> Result<OptionsResult, MarketDataError> {
        let url = format!("{}/{}", self.config.options_url, ticker);
        let query: Vec<(&str, String)> = expiration
            .map(|date| vec![("date", expiration_timestamp(date).to_string())])
            .unwrap_or_default();
        let response: OptionsResponse = self.get_json(&url, &query).await?;

        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::NoExpirations(ticker.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn latest_close(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        let started = Instant::now();
        let result = self.fetch_latest_close(ticker).await;
        record_provider_request(ProviderOp::LatestClose, started.elapsed(), result.is_ok());
        result
    }

    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
        let started = Instant::now();
        let result = self
            .fetch_options(ticker, None)
            .await
            .and_then(|r| parse_expirations(ticker, &r));
        record_provider_request(ProviderOp::Expirations, started.elapsed(), result.is_ok());
        result
    }

    async fn call_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, MarketDataError> {
        let started = Instant::now();
        let result = self
            .fetch_options(ticker, Some(expiration))
            .await
            .and_then(|r| convert_chain(ticker, expiration, r));
        record_provider_request(ProviderOp::CallChain, started.elapsed(), result.is_ok());
        result
    }
}

/// Chart endpoint response
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Options endpoint response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResponse {
    option_chain: OptionsBody,
}

#[derive(Debug, Deserialize)]
struct OptionsBody {
    #[serde(default)]
    result: Vec<OptionsResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResult {
    #[serde(default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<OptionsByDate>,
}

#[derive(Debug, Deserialize)]
struct OptionsByDate {
    #[serde(default)]
    calls: Vec<RawContract>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContract {
    strike: f64,
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
    #[serde(default)]
    volume: Option<u64>,
    #[serde(default)]
    open_interest: Option<u64>,
}

/// Last non-null daily close, falling back to the regular market price
fn parse_latest_close(ticker: &str, response: ChartResponse) -> Result<Decimal, MarketDataError> {
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| MarketDataError::NoPrice(ticker.to_string()))?;

    let close = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.close.iter().rev().find_map(|c| *c))
        .or_else(|| result.meta.and_then(|m| m.regular_market_price));

    close
        .filter(|c| c.is_finite() && *c > 0.0)
        .and_then(Decimal::from_f64)
        .ok_or_else(|| MarketDataError::NoPrice(ticker.to_string()))
}

fn parse_expirations(ticker: &str, result: &OptionsResult) -> Result<Vec<NaiveDate>, MarketDataError> {
    let dates: Vec<NaiveDate> = result
        .expiration_dates
        .iter()
        .filter_map(|ts| DateTime::from_timestamp(*ts, 0))
        .map(|dt| dt.date_naive())
        .collect();

    if dates.is_empty() {
        return Err(MarketDataError::NoExpirations(ticker.to_string()));
    }
    Ok(dates)
}

fn convert_chain(
    ticker: &str,
    expiration: NaiveDate,
    result: OptionsResult,
) -> Result<OptionChain, MarketDataError> {
    let calls: Vec<OptionQuote> = result
        .options
        .into_iter()
        .flat_map(|o| o.calls)
        .filter_map(convert_contract)
        .collect();

    if calls.is_empty() {
        return Err(MarketDataError::NoQuotes {
            ticker: ticker.to_string(),
            expiration,
        });
    }

    Ok(OptionChain {
        ticker: ticker.to_string(),
        expiration,
        calls,
    })
}

fn convert_contract(raw: RawContract) -> Option<OptionQuote> {
    let to_decimal = |v: Option<f64>| v.and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO);

    Some(OptionQuote {
        strike: Decimal::from_f64(raw.strike)?,
        bid: to_decimal(raw.bid),
        ask: to_decimal(raw.ask),
        volume: raw.volume,
        open_interest: raw.open_interest,
        delta: None,
    })
}

fn expiration_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
