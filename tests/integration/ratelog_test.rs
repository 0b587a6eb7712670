//! Integration tests for rate observation logs

use chrono::NaiveDate;
use rate_hedge::config::RateLogConfig;
use rate_hedge::ratelog::{
    build_history, latest_logged_date, load_price_series, write_history_csv, CountryRates,
    PolicySpreadObservation, RateLog, SwapSpreadObservation, TimeRange,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config(dir: &TempDir) -> RateLogConfig {
    RateLogConfig {
        dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_policy_log_same_day_resubmission() {
    let dir = TempDir::new().unwrap();
    let log = RateLog::new(config(&dir).policy_spread_path());
    let rates = |y, p| CountryRates {
        yield_30y: y,
        policy_rate: p,
    };

    let day = date(2025, 6, 20);
    log.upsert(PolicySpreadObservation::new(
        day,
        rates(dec!(4.9), dec!(4.5)),
        rates(dec!(3.2), dec!(2.15)),
        rates(dec!(3.05), dec!(0.5)),
    ))
    .unwrap();
    log.upsert(PolicySpreadObservation::new(
        day,
        rates(dec!(5.0), dec!(4.5)),
        rates(dec!(3.2), dec!(2.15)),
        rates(dec!(3.05), dec!(0.5)),
    ))
    .unwrap();

    let rows = log.load().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].us_spread, dec!(0.5));

    let content = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(
        content.lines().next().unwrap(),
        "Date,US_30Y_Yield,US_Policy,US_Spread,Germany_30Y_Yield,Germany_Policy,Germany_Spread,Japan_30Y_Yield,Japan_Policy,Japan_Spread"
    );
    assert_eq!(
        content.lines().nth(1).unwrap(),
        "2025-06-20,5.0000,4.5000,0.5000,3.2000,2.1500,1.0500,3.0500,0.5000,2.5500"
    );
}

#[test]
fn test_latest_date_across_logs() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    RateLog::new(config.swap_spread_path())
        .upsert(SwapSpreadObservation::new(date(2025, 6, 18), dec!(4.3), dec!(4.9)))
        .unwrap();
    RateLog::new(config.swap_spread_path())
        .upsert(SwapSpreadObservation::new(date(2025, 6, 12), dec!(4.2), dec!(4.8)))
        .unwrap();

    assert_eq!(latest_logged_date(&config).unwrap(), Some(date(2025, 6, 18)));
}

#[test]
fn test_swap_history_export() {
    let dir = TempDir::new().unwrap();
    let swap = dir.path().join("swap.csv");
    let yields = dir.path().join("yield.csv");

    let mut swap_rows = String::from("Date,Price\n");
    let mut yield_rows = String::from("Date,Price\n");
    for day in 1..=20 {
        swap_rows.push_str(&format!("2025-05-{day:02},4.{day:02}\n"));
        yield_rows.push_str(&format!("2025-05-{day:02},5.00\n"));
    }
    std::fs::write(&swap, swap_rows).unwrap();
    std::fs::write(&yields, yield_rows).unwrap();

    let history = build_history(
        &load_price_series(&swap).unwrap(),
        &load_price_series(&yields).unwrap(),
        TimeRange::Week,
        &[7, 30],
    );

    // 05-13 through 05-20
    assert_eq!(history.points.len(), 8);
    assert_eq!(history.points[0].date, date(2025, 5, 13));
    assert_eq!(history.points[7].spread, dec!(-0.80));
    assert_eq!(history.moving_averages[1].yield_ma[7], dec!(5));

    let out = dir.path().join("out/history.csv");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    write_history_csv(&history, &out).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 9);
    assert!(content.starts_with("Date,Swap,Yield,Spread,Yield_MA7,Spread_MA7,Yield_MA30,Spread_MA30"));
}
