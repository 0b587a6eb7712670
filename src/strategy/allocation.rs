//! Capital allocation across shares and calls

use crate::config::HedgeConfig;
use crate::market::CONTRACT_MULTIPLIER;
use crate::options::CallLeg;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percent of total capital put into one ticker's shares and calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSplit {
    pub ticker: String,
    #[serde(default)]
    pub shares_pct: Decimal,
    #[serde(default)]
    pub calls_pct: Decimal,
    /// Index of the bought leg whose premium prices the calls
    #[serde(default)]
    pub leg: Option<usize>,
}

/// A named set of allocation splits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub splits: Vec<AllocationSplit>,
}

impl Strategy {
    /// Sum of all shares and calls percentages
    pub fn total_allocated_pct(&self) -> Decimal {
        self.splits
            .iter()
            .map(|s| s.shares_pct + s.calls_pct)
            .sum()
    }
}

/// Capital, shares and contracts for one ticker within a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub strategy: String,
    pub ticker: String,
    pub shares_pct: Decimal,
    pub calls_pct: Decimal,
    pub capital_for_shares: Decimal,
    pub shares_bought: Decimal,
    pub capital_for_calls: Decimal,
    /// Cost of one bought call, zero without a leg for the ticker
    pub contract_cost: Decimal,
    pub contracts_bought: Decimal,
    /// Covered-call capacity of the shares held
    pub contracts_on_shares: Decimal,
    pub total_contracts: Decimal,
    pub capital_controlled: Decimal,
    /// Capital controlled in base-ticker terms
    pub equivalent_capital: Decimal,
}

/// Totals for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub total_contracts: Decimal,
    pub total_shares: Decimal,
    pub capital_used: Decimal,
    pub capital_controlled: Decimal,
    pub equivalent_capital: Decimal,
}

/// Allocation rows, totals and the over-allocation flag for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub total_allocated_pct: Decimal,
    pub over_allocated: bool,
    pub rows: Vec<AllocationRow>,
    pub summary: StrategySummary,
}

/// Bought leg pricing `split`'s calls: the indexed leg when it is on the
/// split's ticker, otherwise the first leg on that ticker
fn leg_for<'a>(split: &AllocationSplit, legs: &'a [CallLeg]) -> Option<&'a CallLeg> {
    split
        .leg
        .and_then(|i| legs.get(i))
        .filter(|l| l.ticker == split.ticker)
        .or_else(|| legs.iter().find(|l| l.ticker == split.ticker))
}

fn floor_div(amount: Decimal, unit: Decimal) -> Decimal {
    if unit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (amount / unit).floor()
}

/// Split `total_capital` according to `strategy`
///
/// Percentages over 100 in total are flagged but still applied as stated.
/// Contracts are bought with the split's chosen leg, or the first call leg
/// on the same ticker.
pub fn allocate(
    strategy: &Strategy,
    total_capital: Decimal,
    prices: &BTreeMap<String, Decimal>,
    legs: &[CallLeg],
    hedge: &HedgeConfig,
) -> StrategyResult {
    let total_allocated_pct = strategy.total_allocated_pct();
    let over_allocated = total_allocated_pct > Decimal::ONE_HUNDRED;
    if over_allocated {
        tracing::warn!(
            strategy = %strategy.name,
            total_pct = %total_allocated_pct,
            "Total allocation exceeds 100%"
        );
    }

    let rows: Vec<AllocationRow> = strategy
        .splits
        .iter()
        .map(|split| {
            let price = prices.get(&split.ticker).copied().unwrap_or(Decimal::ZERO);
            let capital_for_shares = total_capital * split.shares_pct / Decimal::ONE_HUNDRED;
            let capital_for_calls = total_capital * split.calls_pct / Decimal::ONE_HUNDRED;
            let shares_bought = floor_div(capital_for_shares, price);

            let contract_cost = leg_for(split, legs)
                .map(|l| l.premium * CONTRACT_MULTIPLIER)
                .unwrap_or(Decimal::ZERO);
            let contracts_bought = floor_div(capital_for_calls, contract_cost);
            let contracts_on_shares = floor_div(shares_bought, CONTRACT_MULTIPLIER);
            let total_contracts = contracts_bought + contracts_on_shares;
            let capital_controlled = total_contracts * CONTRACT_MULTIPLIER * price;

            AllocationRow {
                strategy: strategy.name.clone(),
                ticker: split.ticker.clone(),
                shares_pct: split.shares_pct,
                calls_pct: split.calls_pct,
                capital_for_shares,
                shares_bought,
                capital_for_calls,
                contract_cost,
                contracts_bought,
                contracts_on_shares,
                total_contracts,
                capital_controlled,
                equivalent_capital: capital_controlled * hedge.equivalence_for(&split.ticker),
            }
        })
        .collect();

    let summary = StrategySummary {
        strategy: strategy.name.clone(),
        total_contracts: rows.iter().map(|r| r.total_contracts).sum(),
        total_shares: rows.iter().map(|r| r.shares_bought).sum(),
        capital_used: rows
            .iter()
            .map(|r| r.capital_for_shares + r.capital_for_calls)
            .sum(),
        capital_controlled: rows.iter().map(|r| r.capital_controlled).sum(),
        equivalent_capital: rows.iter().map(|r| r.equivalent_capital).sum(),
    };

    StrategyResult {
        name: strategy.name.clone(),
        total_allocated_pct,
        over_allocated,
        rows,
        summary,
    }
}
