//! Call contracts needed to cover a net exposure

use super::ExposureRow;
use crate::market::CONTRACT_MULTIPLIER;
use crate::options::CallLeg;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Share-equivalent dollar exposure of one contract
pub fn per_contract_exposure(delta: Decimal, spot: Decimal) -> Decimal {
    delta * CONTRACT_MULTIPLIER * spot
}

/// Fractional contracts needed to cover `net_exposure`
///
/// Zero when a contract carries no exposure.
pub fn contracts_needed(net_exposure: Decimal, contract_exposure: Decimal) -> Decimal {
    if contract_exposure.is_zero() {
        return Decimal::ZERO;
    }
    net_exposure / contract_exposure
}

/// Premium paid for `contracts` at `bid` per share
pub fn premium_cost(contracts: Decimal, bid: Decimal) -> Decimal {
    contracts * bid * CONTRACT_MULTIPLIER
}

/// Sizing for one bought call leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeLeg {
    pub ticker: String,
    pub net_needed: Decimal,
    pub per_contract_exposure: Decimal,
    pub contracts_needed: Decimal,
    pub total_premium_cost: Decimal,
}

impl HedgeLeg {
    pub fn new(leg: &CallLeg, net_needed: Decimal) -> Self {
        let per_contract = per_contract_exposure(leg.delta, leg.spot);
        let contracts = contracts_needed(net_needed, per_contract);

        Self {
            ticker: leg.ticker.clone(),
            net_needed,
            per_contract_exposure: per_contract,
            contracts_needed: contracts,
            total_premium_cost: premium_cost(contracts, leg.premium),
        }
    }
}

/// Holding exposure joined with its call leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub ticker: String,
    pub shares: Decimal,
    pub current_value: Decimal,
    pub net_needed: Decimal,
    pub per_contract_exposure: Decimal,
    /// Rounded up to whole contracts
    pub contracts_needed: Decimal,
    pub current_exposure: Decimal,
    pub total_premium_cost: Decimal,
    /// Current exposure plus premium cost
    pub total_exposure: Decimal,
}

impl CombinedRow {
    pub fn new(exposure: &ExposureRow, hedge: &HedgeLeg) -> Self {
        Self {
            ticker: exposure.ticker.clone(),
            shares: exposure.shares,
            current_value: exposure.current_value,
            net_needed: exposure.net_needed,
            per_contract_exposure: hedge.per_contract_exposure,
            contracts_needed: hedge.contracts_needed.ceil(),
            current_exposure: exposure.current_exposure,
            total_premium_cost: hedge.total_premium_cost,
            total_exposure: exposure.current_exposure + hedge.total_premium_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DeltaSource;
    use rust_decimal_macros::dec;

    fn leg(delta: Decimal, spot: Decimal, premium: Decimal) -> CallLeg {
        CallLeg {
            ticker: "TLT".to_string(),
            spot,
            offset_pct: dec!(-10),
            target_price: spot * dec!(0.9),
            expiration: None,
            strike: dec!(45),
            premium,
            delta,
            delta_source: DeltaSource::Operator,
            quote: None,
        }
    }

    #[test]
    fn test_per_contract_exposure() {
        assert_eq!(per_contract_exposure(dec!(0.9), dec!(50)), dec!(4500));
    }

    #[test]
    fn test_contracts_needed() {
        let contracts = contracts_needed(dec!(10000), dec!(4500));
        assert_eq!(contracts.round_dp(3), dec!(2.222));
    }

    #[test]
    fn test_contracts_needed_zero_exposure() {
        assert_eq!(contracts_needed(dec!(10000), dec!(0)), dec!(0));
    }

    #[test]
    fn test_premium_cost() {
        assert_eq!(premium_cost(dec!(3), dec!(16.45)), dec!(4935));
    }

    #[test]
    fn test_hedge_leg() {
        let hedge = HedgeLeg::new(&leg(dec!(0.9), dec!(50), dec!(6)), dec!(9000));
        assert_eq!(hedge.per_contract_exposure, dec!(4500));
        assert_eq!(hedge.contracts_needed, dec!(2));
        assert_eq!(hedge.total_premium_cost, dec!(1200));
    }

    #[test]
    fn test_combined_row_rounds_contracts_up() {
        let exposure = ExposureRow {
            ticker: "TLT".to_string(),
            shares: dec!(100),
            current_value: dec!(5000),
            current_exposure: dec!(5000),
            target_exposure: dec!(15000),
            net_needed: dec!(10000),
            multiple: dec!(2.2),
            price: dec!(50),
        };
        let hedge = HedgeLeg::new(&leg(dec!(0.9), dec!(50), dec!(6)), exposure.net_needed);
        let row = CombinedRow::new(&exposure, &hedge);

        assert_eq!(row.contracts_needed, dec!(3));
        assert_eq!(row.total_exposure, row.current_exposure + hedge.total_premium_cost);
    }
}
