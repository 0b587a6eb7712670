//! Holding exposure

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The leveraged position every target is a multiple of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePosition {
    pub ticker: String,
    pub shares: Decimal,
    pub price: Decimal,
}

impl ReferencePosition {
    pub fn exposure(&self) -> Decimal {
        self.shares * self.price
    }
}

/// An ETF holding entered as a dollar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    /// Current market value entered by the operator
    pub value: Decimal,
    pub price: Decimal,
    /// Target exposure as a multiple of the reference exposure
    pub multiple: Decimal,
}

/// Whole shares represented by `value` at `price`
///
/// Rounds half to even; zero when the price is not positive.
pub fn shares_for_value(value: Decimal, price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (value / price).round()
}

/// Exposure figures for one holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    pub ticker: String,
    pub shares: Decimal,
    pub current_value: Decimal,
    pub current_exposure: Decimal,
    pub target_exposure: Decimal,
    pub net_needed: Decimal,
    pub multiple: Decimal,
    pub price: Decimal,
}

impl ExposureRow {
    pub fn new(holding: &Holding, reference_exposure: Decimal) -> Self {
        let shares = shares_for_value(holding.value, holding.price);
        let current_exposure = shares * holding.price;
        let target_exposure = reference_exposure * holding.multiple;

        Self {
            ticker: holding.ticker.clone(),
            shares,
            current_value: holding.value,
            current_exposure,
            target_exposure,
            net_needed: target_exposure - current_exposure,
            multiple: holding.multiple,
            price: holding.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(value: Decimal, price: Decimal, multiple: Decimal) -> Holding {
        Holding {
            ticker: "TLT".to_string(),
            value,
            price,
            multiple,
        }
    }

    #[test]
    fn test_reference_exposure() {
        let reference = ReferencePosition {
            ticker: "TMF".to_string(),
            shares: dec!(7270),
            price: dec!(40),
        };
        assert_eq!(reference.exposure(), dec!(290800));
    }

    #[test]
    fn test_shares_for_value_rounds() {
        assert_eq!(shares_for_value(dec!(1000), dec!(30)), dec!(33));
        assert_eq!(shares_for_value(dec!(1000), dec!(15)), dec!(67));
    }

    #[test]
    fn test_shares_for_value_half_to_even() {
        // 250 / 100 = 2.5 -> 2, 350 / 100 = 3.5 -> 4
        assert_eq!(shares_for_value(dec!(250), dec!(100)), dec!(2));
        assert_eq!(shares_for_value(dec!(350), dec!(100)), dec!(4));
    }

    #[test]
    fn test_shares_for_value_zero_price() {
        assert_eq!(shares_for_value(dec!(1000), dec!(0)), dec!(0));
    }

    #[test]
    fn test_exposure_row() {
        let row = ExposureRow::new(&holding(dec!(10000), dec!(50), dec!(2.2)), dec!(100000));
        assert_eq!(row.shares, dec!(200));
        assert_eq!(row.current_exposure, dec!(10000));
        assert_eq!(row.target_exposure, dec!(220000));
        assert_eq!(row.net_needed, dec!(210000));
    }

    #[test]
    fn test_exposure_is_shares_times_price() {
        let row = ExposureRow::new(&holding(dec!(9990), dec!(87.3), dec!(1.5)), dec!(50000));
        assert_eq!(row.shares, dec!(114));
        assert_eq!(row.current_exposure, row.shares * row.price);
    }
}
