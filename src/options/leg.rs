//! Call-option leg resolution

use super::{nearest_strike, target_price};
use crate::market::{OptionChain, OptionQuote};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a leg's contract details are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Contract picked from the provider's chain
    #[default]
    Automatic,
    /// Strike, bid and delta typed in by the operator
    Manual,
}

/// Where a leg's delta came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSource {
    Provider,
    Operator,
    Default,
}

/// A resolved call contract for one ETF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLeg {
    pub ticker: String,
    /// Underlying spot price
    pub spot: Decimal,
    /// Strike offset used to build the target price
    pub offset_pct: Decimal,
    pub target_price: Decimal,
    pub expiration: Option<NaiveDate>,
    pub strike: Decimal,
    /// Premium paid per share (the bid)
    pub premium: Decimal,
    pub delta: Decimal,
    pub delta_source: DeltaSource,
    /// Chain quote backing an automatic leg
    pub quote: Option<OptionQuote>,
}

impl CallLeg {
    /// Leg built from operator-entered contract details
    pub fn manual(
        ticker: impl Into<String>,
        spot: Decimal,
        offset_pct: Decimal,
        strike: Decimal,
        premium: Decimal,
        delta: Option<Decimal>,
        default_delta: Decimal,
    ) -> Self {
        let (delta, delta_source) = match delta {
            Some(d) => (d, DeltaSource::Operator),
            None => (default_delta, DeltaSource::Default),
        };

        Self {
            ticker: ticker.into(),
            spot,
            offset_pct,
            target_price: target_price(spot, offset_pct),
            expiration: None,
            strike,
            premium,
            delta,
            delta_source,
            quote: None,
        }
    }

    /// Leg picked from a chain
    ///
    /// With `strike` set, the quote nearest that strike is used; otherwise
    /// the quote nearest the offset target price. A quote without delta
    /// falls back to `operator_delta`, then `default_delta`.
    pub fn from_chain(
        chain: &OptionChain,
        spot: Decimal,
        offset_pct: Decimal,
        strike: Option<Decimal>,
        operator_delta: Option<Decimal>,
        default_delta: Decimal,
    ) -> Option<Self> {
        let target = target_price(spot, offset_pct);
        let quote = nearest_strike(&chain.calls, strike.unwrap_or(target))?;

        let (delta, delta_source) = match (quote.delta, operator_delta) {
            (Some(d), _) => (d, DeltaSource::Provider),
            (None, Some(d)) => (d, DeltaSource::Operator),
            (None, None) => (default_delta, DeltaSource::Default),
        };

        if delta_source != DeltaSource::Provider {
            tracing::warn!(
                ticker = %chain.ticker,
                strike = %quote.strike,
                %delta,
                "Delta not available from provider, using substitute"
            );
        }

        Some(Self {
            ticker: chain.ticker.clone(),
            spot,
            offset_pct,
            target_price: target,
            expiration: Some(chain.expiration),
            strike: quote.strike,
            premium: quote.bid,
            delta,
            delta_source,
            quote: Some(quote.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chain(with_delta: bool) -> OptionChain {
        let quote = |strike: Decimal, bid: Decimal| OptionQuote {
            strike,
            bid,
            ask: bid + dec!(0.2),
            volume: Some(5),
            open_interest: Some(50),
            delta: with_delta.then_some(dec!(0.81)),
        };
        OptionChain {
            ticker: "TLT".to_string(),
            expiration: NaiveDate::from_ymd_opt(2025, 9, 19).unwrap(),
            calls: vec![
                quote(dec!(70), dec!(16.45)),
                quote(dec!(80), dec!(7.1)),
                quote(dec!(90), dec!(1.9)),
            ],
        }
    }

    #[test]
    fn test_manual_leg() {
        let leg = CallLeg::manual("TLT", dec!(86), dec!(-10), dec!(70), dec!(16.45), None, dec!(0.9));
        assert_eq!(leg.strike, dec!(70));
        assert_eq!(leg.premium, dec!(16.45));
        assert_eq!(leg.delta, dec!(0.9));
        assert_eq!(leg.delta_source, DeltaSource::Default);
        assert_eq!(leg.target_price, dec!(77.4));
        assert!(leg.expiration.is_none());
    }

    #[test]
    fn test_manual_leg_operator_delta() {
        let leg = CallLeg::manual("EDV", dec!(68), dec!(-13), dec!(56), dec!(8.7), Some(dec!(0.85)), dec!(0.9));
        assert_eq!(leg.delta, dec!(0.85));
        assert_eq!(leg.delta_source, DeltaSource::Operator);
    }

    #[test]
    fn test_from_chain_targets_offset() {
        // 86 * 0.9 = 77.4 -> nearest strike 80
        let leg = CallLeg::from_chain(&chain(true), dec!(86), dec!(-10), None, None, dec!(0.9)).unwrap();
        assert_eq!(leg.strike, dec!(80));
        assert_eq!(leg.premium, dec!(7.1));
        assert_eq!(leg.delta, dec!(0.81));
        assert_eq!(leg.delta_source, DeltaSource::Provider);
        assert_eq!(leg.expiration, NaiveDate::from_ymd_opt(2025, 9, 19));
    }

    #[test]
    fn test_from_chain_explicit_strike() {
        let leg = CallLeg::from_chain(&chain(true), dec!(86), dec!(-10), Some(dec!(70)), None, dec!(0.9)).unwrap();
        assert_eq!(leg.strike, dec!(70));
        assert_eq!(leg.premium, dec!(16.45));
    }

    #[test]
    fn test_from_chain_delta_fallbacks() {
        let operator = CallLeg::from_chain(&chain(false), dec!(86), dec!(-10), None, Some(dec!(0.75)), dec!(0.9)).unwrap();
        assert_eq!(operator.delta, dec!(0.75));
        assert_eq!(operator.delta_source, DeltaSource::Operator);

        let fallback = CallLeg::from_chain(&chain(false), dec!(86), dec!(-10), None, None, dec!(0.9)).unwrap();
        assert_eq!(fallback.delta, dec!(0.9));
        assert_eq!(fallback.delta_source, DeltaSource::Default);
    }

    #[test]
    fn test_from_empty_chain() {
        let mut empty = chain(true);
        empty.calls.clear();
        assert!(CallLeg::from_chain(&empty, dec!(86), dec!(-10), None, None, dec!(0.9)).is_none());
    }
}
