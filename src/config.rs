//! Configuration types for rate-hedge

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub hedge: HedgeConfig,
    #[serde(default)]
    pub rate_log: RateLogConfig,
    pub telemetry: TelemetryConfig,
}

/// Market data provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Base URL for spot price history
    #[serde(default = "default_chart_url")]
    pub chart_url: String,
    /// Base URL for option chains
    #[serde(default = "default_options_url")]
    pub options_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Offline quotes file, required when `kind = "snapshot"`
    pub snapshot_path: Option<PathBuf>,
}

/// Which market data provider to use
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Snapshot,
}

fn default_chart_url() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}
fn default_options_url() -> String {
    "https://query2.finance.yahoo.com/v7/finance/options".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

/// Hedge sizing parameters
#[derive(Debug, Clone, Deserialize)]
pub struct HedgeConfig {
    /// Leveraged position the hedge is sized against
    #[serde(default = "default_reference_ticker")]
    pub reference_ticker: String,

    /// Delta used when neither the provider nor the operator supplies one
    #[serde(default = "default_delta")]
    pub default_delta: Decimal,

    /// First expiration at least this many days out is the default pick
    #[serde(default = "default_min_dte")]
    pub min_days_to_expiration: i64,

    /// Bought-call strike offsets are clamped to +/- this percentage
    #[serde(default = "default_buy_offset_bound")]
    pub buy_offset_bound_pct: Decimal,

    /// Sold-call strike offsets are clamped to +/- this percentage
    #[serde(default = "default_sell_offset_bound")]
    pub sell_offset_bound_pct: Decimal,

    /// Multiple applied to a holding that does not name one
    #[serde(default = "default_fallback_multiple")]
    pub fallback_multiple: Decimal,

    /// Per-ticker target multiples of the reference exposure
    #[serde(default = "default_multiples")]
    pub multiples: BTreeMap<String, Decimal>,

    /// Per-ticker factors converting controlled capital to base-ticker terms
    #[serde(default = "default_equivalence")]
    pub equivalence: BTreeMap<String, Decimal>,
}

fn default_reference_ticker() -> String {
    "TMF".to_string()
}
fn default_delta() -> Decimal {
    Decimal::new(9, 1) // 0.9
}
fn default_min_dte() -> i64 {
    30
}
fn default_buy_offset_bound() -> Decimal {
    Decimal::from(75)
}
fn default_sell_offset_bound() -> Decimal {
    Decimal::from(50)
}
fn default_fallback_multiple() -> Decimal {
    Decimal::new(13, 1) // 1.3
}
fn default_multiples() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("TLT".to_string(), Decimal::new(22, 1)),
        ("EDV".to_string(), Decimal::new(15, 1)),
    ])
}
fn default_equivalence() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("TLT".to_string(), Decimal::ONE),
        ("EDV".to_string(), Decimal::new(13, 1)),
    ])
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            reference_ticker: default_reference_ticker(),
            default_delta: default_delta(),
            min_days_to_expiration: default_min_dte(),
            buy_offset_bound_pct: default_buy_offset_bound(),
            sell_offset_bound_pct: default_sell_offset_bound(),
            fallback_multiple: default_fallback_multiple(),
            multiples: default_multiples(),
            equivalence: default_equivalence(),
        }
    }
}

impl HedgeConfig {
    /// Target multiple for a ticker, falling back to the configured default
    pub fn multiple_for(&self, ticker: &str) -> Decimal {
        self.multiples
            .get(ticker)
            .copied()
            .unwrap_or(self.fallback_multiple)
    }

    /// Equivalence factor for a ticker (1 when unlisted)
    pub fn equivalence_for(&self, ticker: &str) -> Decimal {
        self.equivalence.get(ticker).copied().unwrap_or(Decimal::ONE)
    }
}

/// Rate observation log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLogConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_swap_spread_file")]
    pub swap_spread_file: String,
    #[serde(default = "default_policy_spread_file")]
    pub policy_spread_file: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_swap_spread_file() -> String {
    "sofr_treasury_spread_log.csv".to_string()
}
fn default_policy_spread_file() -> String {
    "thirtyy_spread_log.csv".to_string()
}

impl Default for RateLogConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            swap_spread_file: default_swap_spread_file(),
            policy_spread_file: default_policy_spread_file(),
        }
    }
}

impl RateLogConfig {
    pub fn swap_spread_path(&self) -> PathBuf {
        self.dir.join(&self.swap_spread_file)
    }

    pub fn policy_spread_path(&self) -> PathBuf {
        self.dir.join(&self.policy_spread_file)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
