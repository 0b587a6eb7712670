//! Strategy comparison module
//!
//! Splits the reference capital across shares and calls per strategy, then
//! prices covered-call income and projected returns for each split

mod allocation;
mod income;
mod projection;

pub use allocation::{
    allocate, AllocationRow, AllocationSplit, Strategy, StrategyResult, StrategySummary,
};
pub use income::{income_rows, income_summary, IncomeRow, IncomeSummary, SoldCall};
pub use projection::{annualize, project, Projection};

/// Months in a year, used to annualize monthly premium
pub const MONTHS_PER_YEAR: u32 = 12;
