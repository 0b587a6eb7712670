//! Portfolio hedge analysis
//!
//! An [`AnalysisInput`] plus a [`MarketSnapshot`] fetched for it are turned
//! into an [`AnalysisReport`] by a single pure recompute step.

mod gather;
mod input;
mod pipeline;
mod report;
mod types;

pub use gather::{gather, MarketSnapshot};
pub use input::{
    AnalysisInput, BuyInput, CallLegInput, HoldingInput, ProjectionInput, ReferenceInput,
    SafeCallsInput, SellInput, SellLegInput,
};
pub use pipeline::recompute;
pub use report::{fmt_usd, AnalysisReport};
pub use types::AnalysisError;

use crate::config::HedgeConfig;
use crate::market::MarketDataProvider;
use chrono::NaiveDate;

/// Fetch market data for `input` and run the analysis
pub async fn run_analysis(
    provider: &dyn MarketDataProvider,
    input: &AnalysisInput,
    hedge: &HedgeConfig,
    today: NaiveDate,
) -> Result<AnalysisReport, AnalysisError> {
    input.validate()?;
    let snapshot = gather(provider, input, hedge, today).await?;
    recompute(input, &snapshot, hedge, today)
}
