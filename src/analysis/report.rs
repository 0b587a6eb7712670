//! Analysis report and its text rendering

use crate::hedge::{CombinedRow, ExposureRow, HedgeLeg, ReferencePosition};
use crate::options::{CallLeg, SafeCallTable};
use crate::strategy::{IncomeRow, IncomeSummary, Projection, SoldCall, StrategyResult};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt::Write;

const RULE: &str = "══════════════════════════════════════════════════════════════════════";
const THIN: &str = "──────────────────────────────────────────────────────────────────────";

/// Everything computed for one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub as_of: NaiveDate,
    pub reference: ReferencePosition,
    pub reference_exposure: Decimal,
    pub exposures: Vec<ExposureRow>,
    pub legs: Vec<CallLeg>,
    pub hedges: Vec<HedgeLeg>,
    pub combined: Vec<CombinedRow>,
    pub safe_calls: Vec<SafeCallTable>,
    pub sold_calls: Vec<SoldCall>,
    pub strategies: Vec<StrategyResult>,
    pub income: Vec<IncomeRow>,
    pub income_summaries: Vec<IncomeSummary>,
    pub projections: Vec<Projection>,
    pub upside_pct: Decimal,
    pub months: u32,
    /// Warnings and skipped sections, in the order they arose
    pub notices: Vec<String>,
}

/// Whole dollars with thousands separators, e.g. `-$1,234`
pub fn fmt_usd(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn fmt_pct(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

impl AnalysisReport {
    /// Render as a fixed-width text report
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_table(&mut out);
        out
    }

    fn write_table(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{RULE}")?;
        writeln!(out, "                 BOND ETF HEDGE ANALYSIS ({})", self.as_of)?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "Reference:        {} x {} @ ${:.2} = {}",
            self.reference.ticker,
            self.reference.shares,
            self.reference.price,
            fmt_usd(self.reference_exposure)
        )?;

        writeln!(out, "\nEXPOSURE")?;
        writeln!(out, "{THIN}")?;
        writeln!(
            out,
            "{:<6} {:>8} {:>9} {:>13} {:>6} {:>13} {:>13}",
            "ETF", "Price", "Shares", "Exposure", "Mult", "Target", "Net Needed"
        )?;
        for row in &self.exposures {
            writeln!(
                out,
                "{:<6} {:>8.2} {:>9} {:>13} {:>6.2} {:>13} {:>13}",
                row.ticker,
                row.price,
                row.shares,
                fmt_usd(row.current_exposure),
                row.multiple,
                fmt_usd(row.target_exposure),
                fmt_usd(row.net_needed)
            )?;
        }

        if !self.legs.is_empty() {
            writeln!(out, "\nCALLS TO BUY")?;
            writeln!(out, "{THIN}")?;
            for (leg, sized) in self.legs.iter().zip(&self.hedges) {
                let expiry = leg
                    .expiration
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "manual".to_string());
                writeln!(
                    out,
                    "{:<6} spot ${:.2}  offset {:+.2}% -> ${:.2}  strike ${:.2} ({})",
                    leg.ticker, leg.spot, leg.offset_pct, leg.target_price, leg.strike, expiry
                )?;
                writeln!(
                    out,
                    "       bid ${:.2}  delta {:.2} ({:?})  per contract {}  contracts {:.2}  premium {}",
                    leg.premium,
                    leg.delta,
                    leg.delta_source,
                    fmt_usd(sized.per_contract_exposure),
                    sized.contracts_needed,
                    fmt_usd(sized.total_premium_cost)
                )?;
                if let Some(quote) = &leg.quote {
                    writeln!(out, "       {}", quote.describe())?;
                }
            }
        }

        if !self.combined.is_empty() {
            writeln!(out, "\nCOMBINED")?;
            writeln!(out, "{THIN}")?;
            writeln!(
                out,
                "{:<6} {:>9} {:>13} {:>10} {:>13} {:>13}",
                "ETF", "Shares", "Net Needed", "Contracts", "Premium", "Total Exp."
            )?;
            for row in &self.combined {
                writeln!(
                    out,
                    "{:<6} {:>9} {:>13} {:>10} {:>13} {:>13}",
                    row.ticker,
                    row.shares,
                    fmt_usd(row.net_needed),
                    row.contracts_needed,
                    fmt_usd(row.total_premium_cost),
                    fmt_usd(row.total_exposure)
                )?;
            }
        }

        for table in &self.safe_calls {
            writeln!(
                out,
                "\nSAFE SHORT CALLS: {} {} ({} DTE)",
                table.ticker, table.expiration, table.days_to_expiration
            )?;
            writeln!(out, "{THIN}")?;
            writeln!(
                out,
                "Safe price = strike ${:.2} + premium ${:.2} - short bid",
                table.long_strike, table.long_premium
            )?;
            writeln!(
                out,
                "{:>8} {:>7} {:>7} {:>11} {:>8}",
                "Strike", "Bid", "Ask", "Safe Price", "Margin"
            )?;
            for call in &table.calls {
                writeln!(
                    out,
                    "{:>8.2} {:>7.2} {:>7.2} {:>11.2} {:>8.2}",
                    call.strike, call.bid, call.ask, call.safe_price, call.margin
                )?;
            }
        }

        if !self.sold_calls.is_empty() {
            writeln!(out, "\nCALLS TO SELL")?;
            writeln!(out, "{THIN}")?;
            for call in &self.sold_calls {
                writeln!(
                    out,
                    "{:<6} {} offset {:+.1}% -> ${:.2}  {}",
                    call.ticker,
                    call.expiration,
                    call.offset_pct,
                    call.target_strike,
                    call.quote.describe()
                )?;
            }
        }

        for result in &self.strategies {
            writeln!(
                out,
                "\n{} (allocated {:.1}%)",
                result.name.to_uppercase(),
                result.total_allocated_pct
            )?;
            writeln!(out, "{THIN}")?;
            writeln!(
                out,
                "{:<6} {:>11} {:>7} {:>11} {:>7} {:>7} {:>13} {:>13}",
                "ETF", "Shares $", "Shares", "Calls $", "Bought", "Total", "Controlled", "Equivalent"
            )?;
            for row in &result.rows {
                writeln!(
                    out,
                    "{:<6} {:>11} {:>7} {:>11} {:>7} {:>7} {:>13} {:>13}",
                    row.ticker,
                    fmt_usd(row.capital_for_shares),
                    row.shares_bought,
                    fmt_usd(row.capital_for_calls),
                    row.contracts_bought,
                    row.total_contracts,
                    fmt_usd(row.capital_controlled),
                    fmt_usd(row.equivalent_capital)
                )?;
            }
            let s = &result.summary;
            writeln!(
                out,
                "Total: {} contracts, {} shares, used {}, controls {} ({} equivalent)",
                s.total_contracts,
                s.total_shares,
                fmt_usd(s.capital_used),
                fmt_usd(s.capital_controlled),
                fmt_usd(s.equivalent_capital)
            )?;
        }

        if !self.income_summaries.is_empty() {
            writeln!(out, "\nCOVERED CALL INCOME")?;
            writeln!(out, "{THIN}")?;
            for row in &self.income {
                writeln!(
                    out,
                    "{:<12} {:<6} {:>5} x ${:.2}  premium {}/mo  dividend {}/yr  {}",
                    row.strategy,
                    row.ticker,
                    row.contracts_sold,
                    row.bid,
                    fmt_usd(row.total_premium),
                    fmt_usd(row.annual_dividend),
                    fmt_pct(row.annual_return_pct)
                )?;
            }
            for summary in &self.income_summaries {
                writeln!(
                    out,
                    "{:<12} annual {} monthly {} return {}",
                    summary.strategy,
                    fmt_usd(summary.total_annual_income),
                    fmt_usd(summary.monthly_income),
                    fmt_pct(summary.annual_return_pct)
                )?;
            }
        }

        if !self.projections.is_empty() {
            writeln!(
                out,
                "\nPROJECTED RETURN ({:+.2}% over {} months)",
                self.upside_pct, self.months
            )?;
            writeln!(out, "{THIN}")?;
            for p in &self.projections {
                let annualized = p
                    .annualized_return_pct
                    .map(fmt_pct)
                    .unwrap_or_else(|| "n/a".to_string());
                writeln!(
                    out,
                    "{:<12} used {}  current {}  return {} ({})  annualized {}",
                    p.strategy,
                    fmt_usd(p.capital_used),
                    fmt_usd(p.reference_equivalent),
                    fmt_usd(p.projected_return),
                    fmt_pct(p.period_return_pct),
                    annualized
                )?;
            }
        }

        if !self.notices.is_empty() {
            writeln!(out, "\nNOTICES")?;
            writeln!(out, "{THIN}")?;
            for notice in &self.notices {
                writeln!(out, "! {notice}")?;
            }
        }
        writeln!(out, "{RULE}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fmt_usd() {
        assert_eq!(fmt_usd(dec!(0)), "$0");
        assert_eq!(fmt_usd(dec!(999.4)), "$999");
        assert_eq!(fmt_usd(dec!(1000)), "$1,000");
        assert_eq!(fmt_usd(dec!(1234567.5)), "$1,234,568");
        assert_eq!(fmt_usd(dec!(-4500)), "-$4,500");
        assert_eq!(fmt_usd(dec!(-0.2)), "$0");
    }

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(dec!(4.95)), "4.95%");
        assert_eq!(fmt_pct(dec!(10.711)), "10.71%");
    }

    #[test]
    fn test_format_table_sections() {
        let report = AnalysisReport {
            as_of: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            reference: ReferencePosition {
                ticker: "TMF".to_string(),
                shares: dec!(7270),
                price: dec!(40),
            },
            reference_exposure: dec!(290800),
            exposures: vec![],
            legs: vec![],
            hedges: vec![],
            combined: vec![],
            safe_calls: vec![],
            sold_calls: vec![],
            strategies: vec![],
            income: vec![],
            income_summaries: vec![],
            projections: vec![],
            upside_pct: dec!(10),
            months: 12,
            notices: vec!["Call to sell for EDV skipped".to_string()],
        };

        let table = report.format_table();
        assert!(table.contains("TMF x 7270 @ $40.00 = $290,800"));
        assert!(table.contains("EXPOSURE"));
        assert!(!table.contains("CALLS TO BUY"));
        assert!(table.contains("! Call to sell for EDV skipped"));
    }
}
