//! Strike and expiration selection

use crate::market::OptionQuote;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Price `offset_pct` percent away from `spot`
pub fn target_price(spot: Decimal, offset_pct: Decimal) -> Decimal {
    spot * (Decimal::ONE + offset_pct / Decimal::ONE_HUNDRED)
}

/// Clamp an offset to `[-bound, bound]`
pub fn clamp_offset(offset_pct: Decimal, bound: Decimal) -> Decimal {
    offset_pct.clamp(-bound.abs(), bound.abs())
}

/// Offset for a follower leg: the base offset times `multiple`, clamped
pub fn scaled_offset(base_pct: Decimal, multiple: Decimal, bound: Decimal) -> Decimal {
    clamp_offset(base_pct * multiple, bound)
}

/// Quote whose strike is closest to `target`
///
/// Ties go to the first quote in provider order. Returns `None` for an
/// empty chain.
pub fn nearest_strike(quotes: &[OptionQuote], target: Decimal) -> Option<&OptionQuote> {
    quotes.iter().min_by_key(|q| (q.strike - target).abs())
}

/// Default expiration: the first at least `min_dte` days out, otherwise
/// the first listed
pub fn default_expiration(
    expirations: &[NaiveDate],
    today: NaiveDate,
    min_dte: i64,
) -> Option<NaiveDate> {
    expirations
        .iter()
        .copied()
        .find(|exp| (*exp - today).num_days() >= min_dte)
        .or_else(|| expirations.first().copied())
}
