//! Rate observation logs
//!
//! Daily rate observations kept in flat CSV files, one file per metric
//! family, at most one row per calendar date

mod format;
mod history;
mod observations;
mod store;

pub use format::parse_date;
pub use history::{
    build_history, filter_range, load_price_series, merge_series, moving_average, write_history_csv,
    MovingAverageSeries, PricePoint, SpreadPoint, SwapHistory, TimeRange,
};
pub use observations::{CountryRates, PolicySpreadObservation, SwapSpreadObservation};
pub use store::{LogSummary, Observation, RateLog};

use crate::config::RateLogConfig;
use chrono::NaiveDate;
use thiserror::Error;

/// Rate log errors
#[derive(Debug, Error)]
pub enum RateLogError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV encoding or decoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Existing file is not a dated log
    #[error("{0} has no Date column")]
    MissingDateColumn(String),
}

/// Date an observation is filed under: the explicit date, else today
pub fn observation_date(explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Most recent date recorded in either log
pub fn latest_logged_date(config: &RateLogConfig) -> Result<Option<NaiveDate>, RateLogError> {
    let swap = RateLog::<SwapSpreadObservation>::new(config.swap_spread_path()).latest_date()?;
    let policy =
        RateLog::<PolicySpreadObservation>::new(config.policy_spread_path()).latest_date()?;
    Ok(swap.max(policy))
}
