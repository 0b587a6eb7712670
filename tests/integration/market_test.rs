//! Integration tests for market data providers

use rate_hedge::config::{ProviderConfig, ProviderKind};
use rate_hedge::market::{create_provider, MarketDataError};
use rust_decimal_macros::dec;
use std::path::PathBuf;

fn snapshot_config(path: Option<PathBuf>) -> ProviderConfig {
    ProviderConfig {
        kind: ProviderKind::Snapshot,
        chart_url: String::new(),
        options_url: String::new(),
        timeout_secs: 1,
        snapshot_path: path,
    }
}

#[tokio::test]
async fn test_snapshot_provider_from_config() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/quotes.json");
    let provider = create_provider(&snapshot_config(Some(path))).unwrap();

    assert_eq!(provider.latest_close("TLT").await.unwrap(), dec!(86.2));

    let expirations = provider.expirations("TLT").await.unwrap();
    assert_eq!(expirations.len(), 2);

    let chain = provider.call_chain("EDV", expirations[1]).await.unwrap();
    assert_eq!(chain.calls.len(), 4);
    assert_eq!(chain.calls[1].delta, Some(dec!(0.79)));
}

#[tokio::test]
async fn test_snapshot_provider_missing_data() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/quotes.json");
    let provider = create_provider(&snapshot_config(Some(path))).unwrap();

    assert!(matches!(
        provider.latest_close("ZROZ").await,
        Err(MarketDataError::NoPrice(_))
    ));
    assert!(matches!(
        provider.expirations("ZROZ").await,
        Err(MarketDataError::NoExpirations(_))
    ));
}

#[test]
fn test_snapshot_provider_requires_path() {
    assert!(create_provider(&snapshot_config(None)).is_err());
}

#[test]
fn test_yahoo_provider_builds() {
    let config = ProviderConfig {
        kind: ProviderKind::Yahoo,
        chart_url: "http://localhost:1/chart".to_string(),
        options_url: "http://localhost:1/options".to_string(),
        timeout_secs: 1,
        snapshot_path: None,
    };
    assert!(create_provider(&config).is_ok());
}
