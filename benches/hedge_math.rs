//! Benchmarks for strike selection and analysis recompute

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rate_hedge::analysis::{gather, recompute, AnalysisInput};
use rate_hedge::config::Config;
use rate_hedge::market::{OptionQuote, SnapshotProvider};
use rate_hedge::options::nearest_strike;
use rate_hedge::ratelog::moving_average;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn benchmark_nearest_strike(c: &mut Criterion) {
    let quotes: Vec<OptionQuote> = (0..200)
        .map(|i| OptionQuote {
            strike: Decimal::from(40 + i / 2),
            bid: dec!(1.5),
            ask: dec!(1.6),
            volume: None,
            open_interest: None,
            delta: None,
        })
        .collect();

    c.bench_function("nearest_strike_200", |b| {
        b.iter(|| nearest_strike(black_box(&quotes), black_box(dec!(87.3))))
    });
}

fn benchmark_recompute(c: &mut Criterion) {
    let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
    let input: AnalysisInput = toml::from_str(include_str!("../analysis.toml")).unwrap();
    let provider = SnapshotProvider::new(
        serde_json::from_str(include_str!("../demos/quotes.json")).unwrap(),
    );
    let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let snapshot = runtime
        .block_on(gather(&provider, &input, &config.hedge, today))
        .unwrap();

    c.bench_function("analysis_recompute", |b| {
        b.iter(|| recompute(black_box(&input), black_box(&snapshot), &config.hedge, today))
    });
}

fn benchmark_moving_average(c: &mut Criterion) {
    let values: Vec<Decimal> = (0..1250).map(|i| Decimal::new(400 + i % 90, 2)).collect();

    c.bench_function("moving_average_90_over_5y", |b| {
        b.iter(|| moving_average(black_box(&values), 90))
    });
}

criterion_group!(
    benches,
    benchmark_nearest_strike,
    benchmark_recompute,
    benchmark_moving_average
);
criterion_main!(benches);
