//! Safe short-call screen
//!
//! For a bought call with strike K and premium P, selling a call with bid B
//! leaves a break-even ("safe") price of K + P - B. A short call is safe
//! when that price is positive and below the short strike.

use crate::market::OptionChain;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One short call that passes the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeCall {
    pub strike: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub safe_price: Decimal,
    /// Short strike minus safe price
    pub margin: Decimal,
}

/// Screen result for one bought call and one short expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeCallTable {
    pub ticker: String,
    pub expiration: NaiveDate,
    pub days_to_expiration: i64,
    pub long_strike: Decimal,
    pub long_premium: Decimal,
    /// Sorted by ascending margin
    pub calls: Vec<SafeCall>,
}

/// Screen `chain` for short calls that stay above the bought call's cost
pub fn safe_short_calls(
    long_strike: Decimal,
    long_premium: Decimal,
    chain: &OptionChain,
    today: NaiveDate,
) -> SafeCallTable {
    let mut calls: Vec<SafeCall> = chain
        .calls
        .iter()
        .map(|q| {
            let safe_price = long_strike + long_premium - q.bid;
            SafeCall {
                strike: q.strike,
                bid: q.bid,
                ask: q.ask,
                safe_price,
                margin: q.strike - safe_price,
            }
        })
        .filter(|c| c.safe_price > Decimal::ZERO && c.margin > Decimal::ZERO)
        .collect();

    calls.sort_by_key(|c| c.margin);

    SafeCallTable {
        ticker: chain.ticker.clone(),
        expiration: chain.expiration,
        days_to_expiration: chain.days_to_expiration(today),
        long_strike,
        long_premium,
        calls,
    }
}
