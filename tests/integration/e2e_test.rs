//! End-to-end analysis against the bundled quote snapshot

use chrono::NaiveDate;
use rate_hedge::analysis::{recompute, run_analysis, AnalysisInput, AnalysisReport};
use rate_hedge::config::Config;
use rate_hedge::market::{QuoteSnapshot, SnapshotProvider};
use rust_decimal_macros::dec;

const QUOTES: &str = include_str!("../../demos/quotes.json");
const INPUT: &str = include_str!("../../analysis.toml");
const CONFIG: &str = include_str!("../../config.toml.example");

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
}

async fn report() -> AnalysisReport {
    let config: Config = toml::from_str(CONFIG).unwrap();
    let input: AnalysisInput = toml::from_str(INPUT).unwrap();
    let snapshot: QuoteSnapshot = serde_json::from_str(QUOTES).unwrap();
    let provider = SnapshotProvider::new(snapshot);

    run_analysis(&provider, &input, &config.hedge, as_of())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_exposure_and_contracts() {
    let report = report().await;

    // 7270 * 40.5
    assert_eq!(report.reference_exposure, dec!(294435));

    let tlt = &report.exposures[0];
    assert_eq!(tlt.shares, dec!(1160));
    assert_eq!(tlt.current_exposure, dec!(99992));
    assert_eq!(tlt.net_needed, dec!(547765));

    let edv = &report.exposures[1];
    assert_eq!(edv.shares, dec!(731));

    // 547765 / (0.9 * 100 * 86.2) = 70.6 -> 71
    assert_eq!(report.combined[0].contracts_needed, dec!(71));
    assert_eq!(report.hedges[0].per_contract_exposure, dec!(7758));
}

#[tokio::test]
async fn test_automatic_leg_picks_chain_quote() {
    let report = report().await;
    let edv = &report.legs[1];

    // 68.4 * (1 - 0.13) = 59.508 -> 60 strike on the first expiration 30+ days out
    assert_eq!(edv.offset_pct, dec!(-13));
    assert_eq!(edv.strike, dec!(60));
    assert_eq!(edv.premium, dec!(10.9));
    assert_eq!(edv.delta, dec!(0.79));
    assert_eq!(edv.expiration, NaiveDate::from_ymd_opt(2025, 9, 19));
}

#[tokio::test]
async fn test_safe_calls_and_sold_calls() {
    let report = report().await;

    let counts: Vec<usize> = report.safe_calls.iter().map(|t| t.calls.len()).collect();
    assert_eq!(counts, vec![4, 2]);
    assert_eq!(report.safe_calls[0].days_to_expiration, 28);
    assert_eq!(report.safe_calls[0].calls[0].margin, dec!(1.55));

    let strikes: Vec<_> = report.sold_calls.iter().map(|c| c.quote.strike).collect();
    assert_eq!(strikes, vec![dec!(90), dec!(70)]);
    assert!(report.notices.is_empty());
}

#[tokio::test]
async fn test_strategies_income_and_projection() {
    let report = report().await;

    let first = &report.strategies[0];
    assert_eq!(first.rows[0].contracts_bought, dec!(89));
    assert_eq!(first.rows[1].shares_bought, dec!(2152));
    assert_eq!(first.rows[1].contracts_on_shares, dec!(21));

    let second = &report.strategies[1];
    assert_eq!(second.rows[1].contracts_bought, dec!(135));

    assert_eq!(report.income_summaries.len(), 2);
    assert_eq!(report.income.len(), 4);
    assert_eq!(report.projections.len(), 2);
    assert!(report.projections[0].annualized_return_pct.is_some());
}

#[tokio::test]
async fn test_recompute_is_repeatable() {
    let config: Config = toml::from_str(CONFIG).unwrap();
    let input: AnalysisInput = toml::from_str(INPUT).unwrap();
    let provider = SnapshotProvider::new(serde_json::from_str(QUOTES).unwrap());
    let snapshot = rate_hedge::analysis::gather(&provider, &input, &config.hedge, as_of())
        .await
        .unwrap();

    let a = recompute(&input, &snapshot, &config.hedge, as_of()).unwrap();
    let b = recompute(&input, &snapshot, &config.hedge, as_of()).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[tokio::test]
async fn test_table_and_json_output() {
    let report = report().await;

    let table = report.format_table();
    assert!(table.contains("TMF x 7270 @ $40.50 = $294,435"));
    assert!(table.contains("SAFE SHORT CALLS: TLT 2025-07-18 (28 DTE)"));
    assert!(table.contains("STRATEGY 2"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["legs"][1]["delta_source"], "provider");
    assert_eq!(json["as_of"], "2025-06-20");
}
