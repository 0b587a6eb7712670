//! Projected and annualized returns

use super::{StrategySummary, MONTHS_PER_YEAR};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Return projection for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub strategy: String,
    pub total_contracts: Decimal,
    pub total_shares: Decimal,
    pub capital_used: Decimal,
    pub equivalent_capital: Decimal,
    /// Capital used scaled by the reference multiple
    pub reference_equivalent: Decimal,
    pub projected_return: Decimal,
    pub period_return_pct: Decimal,
    /// Absent when the period loses all capital or more
    pub annualized_return_pct: Option<Decimal>,
}

/// Compound a period return over `months` into an annual rate
///
/// Returns `None` when `1 + period` is not positive, where no real
/// annualized rate exists. Rates past `Decimal::MAX` saturate there.
pub fn annualize(period_return_pct: Decimal, months: u32) -> Option<Decimal> {
    if months == 0 {
        return Some(Decimal::ZERO);
    }
    let growth = (Decimal::ONE + period_return_pct / Decimal::ONE_HUNDRED).to_f64()?;
    if growth <= 0.0 {
        return None;
    }
    let exponent = f64::from(MONTHS_PER_YEAR) / f64::from(months);
    let annualized = (growth.powf(exponent) - 1.0) * 100.0;
    Some(Decimal::from_f64(annualized).map_or(Decimal::MAX, |d| d.round_dp(4)))
}

/// Project a strategy's return for an expected move of `upside_pct`
pub fn project(
    summary: &StrategySummary,
    upside_pct: Decimal,
    months: u32,
    reference_multiple: Decimal,
) -> Projection {
    let projected_return = summary.equivalent_capital * upside_pct / Decimal::ONE_HUNDRED;

    let (period_return_pct, annualized_return_pct) =
        if summary.capital_used > Decimal::ZERO && months > 0 {
            let period = projected_return / summary.capital_used * Decimal::ONE_HUNDRED;
            (period, annualize(period, months))
        } else {
            (Decimal::ZERO, Some(Decimal::ZERO))
        };

    Projection {
        strategy: summary.strategy.clone(),
        total_contracts: summary.total_contracts,
        total_shares: summary.total_shares,
        capital_used: summary.capital_used,
        equivalent_capital: summary.equivalent_capital,
        reference_equivalent: summary.capital_used * reference_multiple,
        projected_return,
        period_return_pct,
        annualized_return_pct,
    }
}
