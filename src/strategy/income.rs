//! Covered-call income
//!
//! Premium from selling the strategy's contracts every month, plus the
//! dividend yield on the shares held.

use super::{StrategyResult, MONTHS_PER_YEAR};
use crate::market::{OptionQuote, CONTRACT_MULTIPLIER};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The call chosen to sell against one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldCall {
    pub ticker: String,
    pub spot: Decimal,
    pub offset_pct: Decimal,
    pub target_strike: Decimal,
    pub expiration: NaiveDate,
    pub dividend_yield_pct: Decimal,
    pub quote: OptionQuote,
}

/// Income from one ticker in one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    pub strategy: String,
    pub ticker: String,
    pub strike: Decimal,
    pub bid: Decimal,
    pub contracts_sold: Decimal,
    pub total_premium: Decimal,
    pub annual_premium: Decimal,
    pub annual_dividend: Decimal,
    pub total_annual_income: Decimal,
    pub monthly_income: Decimal,
    /// Percent of the strategy's capital used
    pub annual_return_pct: Decimal,
}

/// Income totals for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub strategy: String,
    pub annual_return_pct: Decimal,
    pub capital_used: Decimal,
    pub total_annual_income: Decimal,
    pub monthly_income: Decimal,
}

fn return_pct(income: Decimal, capital: Decimal) -> Decimal {
    if capital > Decimal::ZERO {
        income / capital * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Income rows for every sold call whose ticker the strategy holds
pub fn income_rows(result: &StrategyResult, sold: &[SoldCall]) -> Vec<IncomeRow> {
    let months = Decimal::from(MONTHS_PER_YEAR);
    let capital_used = result.summary.capital_used;

    sold.iter()
        .map(|call| {
            let row = result.rows.iter().find(|r| r.ticker == call.ticker);
            let contracts_sold = row.map(|r| r.total_contracts).unwrap_or(Decimal::ZERO);
            let shares_held = row.map(|r| r.shares_bought).unwrap_or(Decimal::ZERO);

            let total_premium = contracts_sold * call.quote.bid * CONTRACT_MULTIPLIER;
            let annual_premium = total_premium * months;
            let annual_dividend =
                shares_held * call.spot * call.dividend_yield_pct / Decimal::ONE_HUNDRED;
            let total_annual_income = annual_dividend + annual_premium;

            IncomeRow {
                strategy: result.name.clone(),
                ticker: call.ticker.clone(),
                strike: call.quote.strike,
                bid: call.quote.bid,
                contracts_sold,
                total_premium,
                annual_premium,
                annual_dividend,
                total_annual_income,
                monthly_income: total_annual_income / months,
                annual_return_pct: return_pct(total_annual_income, capital_used),
            }
        })
        .collect()
}

/// Combine a strategy's income rows
pub fn income_summary(result: &StrategyResult, rows: &[IncomeRow]) -> IncomeSummary {
    let total_annual_income: Decimal = rows
        .iter()
        .filter(|r| r.strategy == result.name)
        .map(|r| r.total_annual_income)
        .sum();
    let capital_used = result.summary.capital_used;

    IncomeSummary {
        strategy: result.name.clone(),
        annual_return_pct: return_pct(total_annual_income, capital_used),
        capital_used,
        total_annual_income,
        monthly_income: total_annual_income / Decimal::from(MONTHS_PER_YEAR),
    }
}
