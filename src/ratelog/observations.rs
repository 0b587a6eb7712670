//! Observation rows for the two rate log families

use super::format::{four_dp, iso_date};
use super::store::Observation;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SOFR swap rate against the 30-year Treasury yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSpreadObservation {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: NaiveDate,
    #[serde(rename = "SOFR_Swap", with = "four_dp")]
    pub sofr_swap: Decimal,
    #[serde(rename = "Treasury_Yield", with = "four_dp")]
    pub treasury_yield: Decimal,
    /// Swap minus yield
    #[serde(rename = "Spread", with = "four_dp")]
    pub spread: Decimal,
}

impl SwapSpreadObservation {
    pub fn new(date: NaiveDate, sofr_swap: Decimal, treasury_yield: Decimal) -> Self {
        Self {
            date,
            sofr_swap,
            treasury_yield,
            spread: sofr_swap - treasury_yield,
        }
    }
}

impl Observation for SwapSpreadObservation {
    const NAME: &'static str = "swap_spread";

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// One country's long yield and policy rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryRates {
    pub yield_30y: Decimal,
    pub policy_rate: Decimal,
}

impl CountryRates {
    pub fn spread(&self) -> Decimal {
        self.yield_30y - self.policy_rate
    }
}

/// 30-year yield over policy rate for the US, Germany and Japan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySpreadObservation {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: NaiveDate,

    #[serde(rename = "US_30Y_Yield", with = "four_dp")]
    pub us_30y_yield: Decimal,
    #[serde(rename = "US_Policy", with = "four_dp")]
    pub us_policy: Decimal,
    #[serde(rename = "US_Spread", with = "four_dp")]
    pub us_spread: Decimal,

    #[serde(rename = "Germany_30Y_Yield", with = "four_dp")]
    pub germany_30y_yield: Decimal,
    #[serde(rename = "Germany_Policy", with = "four_dp")]
    pub germany_policy: Decimal,
    #[serde(rename = "Germany_Spread", with = "four_dp")]
    pub germany_spread: Decimal,

    #[serde(rename = "Japan_30Y_Yield", with = "four_dp")]
    pub japan_30y_yield: Decimal,
    #[serde(rename = "Japan_Policy", with = "four_dp")]
    pub japan_policy: Decimal,
    #[serde(rename = "Japan_Spread", with = "four_dp")]
    pub japan_spread: Decimal,
}

impl PolicySpreadObservation {
    pub fn new(date: NaiveDate, us: CountryRates, germany: CountryRates, japan: CountryRates) -> Self {
        Self {
            date,
            us_30y_yield: us.yield_30y,
            us_policy: us.policy_rate,
            us_spread: us.spread(),
            germany_30y_yield: germany.yield_30y,
            germany_policy: germany.policy_rate,
            germany_spread: germany.spread(),
            japan_30y_yield: japan.yield_30y,
            japan_policy: japan.policy_rate,
            japan_spread: japan.spread(),
        }
    }
}

impl Observation for PolicySpreadObservation {
    const NAME: &'static str = "policy_spread";

    fn date(&self) -> NaiveDate {
        self.date
    }
}
