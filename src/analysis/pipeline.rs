//! Pure recompute step from input and quotes to report

use super::{AnalysisError, AnalysisInput, AnalysisReport, CallLegInput, MarketSnapshot};
use crate::config::HedgeConfig;
use crate::hedge::{CombinedRow, ExposureRow, HedgeLeg, Holding, ReferencePosition};
use crate::options::{
    clamp_offset, nearest_strike, safe_short_calls, scaled_offset, target_price, CallLeg,
    EntryMode,
};
use crate::strategy::{allocate, income_rows, income_summary, project, SoldCall};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Offset for the leg at `index`: its own, the base for the first, or the
/// base scaled by `multiple` for the rest
fn leg_offset(
    own: Option<Decimal>,
    index: usize,
    base: Decimal,
    multiple: Decimal,
    bound: Decimal,
) -> Decimal {
    match (own, index) {
        (Some(pct), _) => clamp_offset(pct, bound),
        (None, 0) => clamp_offset(base, bound),
        (None, _) => scaled_offset(base, multiple, bound),
    }
}

fn resolve_leg(
    index: usize,
    leg: &CallLegInput,
    offset_pct: Decimal,
    snapshot: &MarketSnapshot,
    hedge: &HedgeConfig,
) -> Result<CallLeg, AnalysisError> {
    let spot = snapshot.price(&leg.ticker)?;

    match leg.mode {
        EntryMode::Manual => {
            let (Some(strike), Some(bid)) = (leg.strike, leg.bid) else {
                return Err(AnalysisError::InvalidInput(format!(
                    "manual leg {} needs strike and bid",
                    leg.ticker
                )));
            };
            let mut call = CallLeg::manual(
                &leg.ticker,
                spot,
                offset_pct,
                strike,
                bid,
                leg.delta,
                hedge.default_delta,
            );
            call.expiration = leg.expiration;
            Ok(call)
        }
        EntryMode::Automatic => {
            let chain = snapshot
                .buy_chains
                .get(&index)
                .ok_or_else(|| AnalysisError::MissingChain(leg.ticker.clone()))?;
            CallLeg::from_chain(chain, spot, offset_pct, leg.strike, leg.delta, hedge.default_delta)
                .ok_or_else(|| AnalysisError::MissingChain(leg.ticker.clone()))
        }
    }
}

/// Build the full report from `input` and already-fetched quotes
pub fn recompute(
    input: &AnalysisInput,
    snapshot: &MarketSnapshot,
    hedge: &HedgeConfig,
    today: NaiveDate,
) -> Result<AnalysisReport, AnalysisError> {
    let mut notices = snapshot.notices.clone();

    let reference_ticker = input.reference_ticker(&hedge.reference_ticker);
    let reference = ReferencePosition {
        ticker: reference_ticker.to_string(),
        shares: input.reference.shares,
        price: snapshot.price(reference_ticker)?,
    };
    let reference_exposure = reference.exposure();

    let exposures = input
        .holdings
        .iter()
        .map(|h| -> Result<ExposureRow, AnalysisError> {
            let holding = Holding {
                ticker: h.ticker.clone(),
                value: h.value,
                price: snapshot.price(&h.ticker)?,
                multiple: h.multiple.unwrap_or_else(|| hedge.multiple_for(&h.ticker)),
            };
            Ok(ExposureRow::new(&holding, reference_exposure))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut legs = Vec::with_capacity(input.buy.legs.len());
    for (i, leg) in input.buy.legs.iter().enumerate() {
        let offset = leg_offset(
            leg.offset_pct,
            i,
            input.buy.offset_pct,
            input.buy.offset_multiple,
            hedge.buy_offset_bound_pct,
        );
        legs.push(resolve_leg(i, leg, offset, snapshot, hedge)?);
    }

    let mut hedges = Vec::with_capacity(legs.len());
    let mut combined = Vec::new();
    for leg in &legs {
        let exposure = exposures.iter().find(|e| e.ticker == leg.ticker);
        let net_needed = match exposure {
            Some(row) => row.net_needed,
            None => {
                notices.push(format!(
                    "{} is not a holding; contracts sized against zero net exposure",
                    leg.ticker
                ));
                Decimal::ZERO
            }
        };
        let sized = HedgeLeg::new(leg, net_needed);
        if let Some(row) = exposure {
            combined.push(CombinedRow::new(row, &sized));
        }
        hedges.push(sized);
    }

    let mut safe_calls = Vec::new();
    if input.safe_calls.enabled {
        for (i, leg) in legs.iter().enumerate() {
            let Some(chain) = snapshot.safe_chains.get(&i) else {
                continue;
            };
            let table = safe_short_calls(leg.strike, leg.premium, chain, today);
            if table.calls.is_empty() {
                notices.push(format!(
                    "No safe short calls for {} on {}",
                    table.ticker, table.expiration
                ));
            }
            safe_calls.push(table);
        }
    }

    let mut sold_calls = Vec::new();
    for (i, leg) in input.sell.legs.iter().enumerate() {
        let (Some(chain), Some(&spot)) = (
            snapshot.sell_chains.get(&i),
            snapshot.prices.get(&leg.ticker),
        ) else {
            continue;
        };
        let offset = leg_offset(
            None,
            i,
            input.sell.offset_pct,
            input.sell.strike_multiple,
            hedge.sell_offset_bound_pct,
        );
        let target = target_price(spot, offset);
        match nearest_strike(&chain.calls, target) {
            Some(quote) => sold_calls.push(SoldCall {
                ticker: leg.ticker.clone(),
                spot,
                offset_pct: offset,
                target_strike: target,
                expiration: chain.expiration,
                dividend_yield_pct: leg.dividend_yield_pct,
                quote: quote.clone(),
            }),
            None => notices.push(format!("No calls to sell for {}", leg.ticker)),
        }
    }

    let strategies: Vec<_> = input
        .strategies
        .iter()
        .map(|s| allocate(s, reference_exposure, &snapshot.prices, &legs, hedge))
        .collect();
    for result in strategies.iter().filter(|r| r.over_allocated) {
        notices.push(format!(
            "{}: total allocation exceeds 100% ({:.1}%)",
            result.name, result.total_allocated_pct
        ));
    }

    let mut income = Vec::new();
    let mut income_summaries = Vec::new();
    if !sold_calls.is_empty() {
        for result in &strategies {
            let rows = income_rows(result, &sold_calls);
            income_summaries.push(income_summary(result, &rows));
            income.extend(rows);
        }
    }

    let reference_multiple = exposures
        .first()
        .map(|e| e.multiple)
        .unwrap_or(hedge.fallback_multiple);
    let projections = strategies
        .iter()
        .map(|r| {
            project(
                &r.summary,
                input.projection.upside_pct,
                input.projection.months,
                reference_multiple,
            )
        })
        .collect();

    tracing::info!(
        reference = %reference.ticker,
        exposure = %reference_exposure.round_dp(2),
        legs = legs.len(),
        strategies = strategies.len(),
        notices = notices.len(),
        "Analysis recomputed"
    );

    Ok(AnalysisReport {
        as_of: today,
        reference,
        reference_exposure,
        exposures,
        legs,
        hedges,
        combined,
        safe_calls,
        sold_calls,
        strategies,
        income,
        income_summaries,
        projections,
        upside_pct: input.projection.upside_pct,
        months: input.projection.months,
        notices,
    })
}
