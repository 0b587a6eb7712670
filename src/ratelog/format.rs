//! CSV field formats shared by the rate logs

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date written as ISO, ISO with a time, or US month/day/year
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
                .map(|dt| dt.date())
                .ok()
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok())
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// `Date` column: written ISO, read leniently
pub mod iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}

/// Rate columns: written with four decimals
pub mod four_dp {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.4}", value.round_dp(4)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_decimal(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid number: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 20);
        assert_eq!(parse_date("2025-06-20"), expected);
        assert_eq!(parse_date(" 2025-06-20 00:00:00 "), expected);
        assert_eq!(parse_date("2025-06-20T00:00:00"), expected);
        assert_eq!(parse_date("06/20/2025"), expected);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025-13-40"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("4.3000"), Some(dec!(4.3)));
        assert_eq!(parse_decimal(" -0.6 "), Some(dec!(-0.6)));
        assert_eq!(parse_decimal("1,234.5"), Some(dec!(1234.5)));
        assert_eq!(parse_decimal("abc"), None);
    }
}
