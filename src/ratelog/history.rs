//! Historical swap spread series
//!
//! Joins a swap-rate price history with a 30-year yield history by date and
//! derives the spread plus trailing moving averages.

use super::format::{four_dp, iso_date};
use super::RateLogError;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// One row of a `Date,Price` history file
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PricePoint {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: NaiveDate,
    #[serde(rename = "Price", with = "four_dp")]
    pub price: Decimal,
}

/// Swap, yield and spread on one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadPoint {
    pub date: NaiveDate,
    pub swap: Decimal,
    #[serde(rename = "yield")]
    pub yield_30y: Decimal,
    pub spread: Decimal,
}

/// Lookback window applied before charting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
    HalfYear,
    #[default]
    Year,
    TwoYears,
    ThreeYears,
    FiveYears,
    All,
}

impl TimeRange {
    /// Days kept before the latest date, `None` for everything
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
            TimeRange::Quarter => Some(90),
            TimeRange::HalfYear => Some(180),
            TimeRange::Year => Some(365),
            TimeRange::TwoYears => Some(730),
            TimeRange::ThreeYears => Some(1095),
            TimeRange::FiveYears => Some(1825),
            TimeRange::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "7D",
            TimeRange::Month => "1M",
            TimeRange::Quarter => "3M",
            TimeRange::HalfYear => "6M",
            TimeRange::Year => "1Y",
            TimeRange::TwoYears => "2Y",
            TimeRange::ThreeYears => "3Y",
            TimeRange::FiveYears => "5Y",
            TimeRange::All => "All",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "7D" => Ok(TimeRange::Week),
            "1M" => Ok(TimeRange::Month),
            "3M" => Ok(TimeRange::Quarter),
            "6M" => Ok(TimeRange::HalfYear),
            "1Y" => Ok(TimeRange::Year),
            "2Y" => Ok(TimeRange::TwoYears),
            "3Y" => Ok(TimeRange::ThreeYears),
            "5Y" => Ok(TimeRange::FiveYears),
            "ALL" => Ok(TimeRange::All),
            other => Err(format!(
                "unknown range '{other}', expected one of 7D, 1M, 3M, 6M, 1Y, 2Y, 3Y, 5Y, All"
            )),
        }
    }
}

/// Trailing means of yield and spread for one window length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub yield_ma: Vec<Decimal>,
    pub spread_ma: Vec<Decimal>,
}

/// Filtered spread series and its moving averages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapHistory {
    pub range: TimeRange,
    pub points: Vec<SpreadPoint>,
    pub moving_averages: Vec<MovingAverageSeries>,
}

/// Read a `Date,Price` history file, skipping rows that do not parse
pub fn load_price_series(path: impl AsRef<Path>) -> Result<Vec<PricePoint>, RateLogError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<PricePoint>() {
        match result {
            Ok(point) => points.push(point),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Skipped unparseable price rows");
    }
    tracing::debug!(path = %path.display(), points = points.len(), "Loaded price series");

    Ok(points)
}

/// Inner-join two series on date, ascending
pub fn merge_series(swap: &[PricePoint], yields: &[PricePoint]) -> Vec<SpreadPoint> {
    let yields: BTreeMap<NaiveDate, Decimal> = yields.iter().map(|p| (p.date, p.price)).collect();
    let swaps: BTreeMap<NaiveDate, Decimal> = swap.iter().map(|p| (p.date, p.price)).collect();

    swaps
        .into_iter()
        .filter_map(|(date, swap)| {
            yields.get(&date).map(|&yield_30y| SpreadPoint {
                date,
                swap,
                yield_30y,
                spread: swap - yield_30y,
            })
        })
        .collect()
}

/// Keep points within `range` of the latest date
pub fn filter_range(points: &[SpreadPoint], range: TimeRange) -> Vec<SpreadPoint> {
    let (Some(days), Some(latest)) = (range.days(), points.iter().map(|p| p.date).max()) else {
        return points.to_vec();
    };
    let cutoff = latest - Duration::days(days);
    points.iter().filter(|p| p.date >= cutoff).copied().collect()
}

/// Trailing mean over up to `window` values, starting from the first value
pub fn moving_average(values: &[Decimal], window: usize) -> Vec<Decimal> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<Decimal>() / Decimal::from(slice.len())
        })
        .collect()
}

/// Merge, filter and smooth the two histories
pub fn build_history(
    swap: &[PricePoint],
    yields: &[PricePoint],
    range: TimeRange,
    windows: &[usize],
) -> SwapHistory {
    let points = filter_range(&merge_series(swap, yields), range);
    let yield_values: Vec<Decimal> = points.iter().map(|p| p.yield_30y).collect();
    let spread_values: Vec<Decimal> = points.iter().map(|p| p.spread).collect();

    let moving_averages = windows
        .iter()
        .map(|&window| MovingAverageSeries {
            window,
            yield_ma: moving_average(&yield_values, window),
            spread_ma: moving_average(&spread_values, window),
        })
        .collect();

    SwapHistory {
        range,
        points,
        moving_averages,
    }
}

/// Write the series with one column pair per moving average
pub fn write_history_csv(history: &SwapHistory, path: impl AsRef<Path>) -> Result<(), RateLogError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = ["Date", "Swap", "Yield", "Spread"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for ma in &history.moving_averages {
        header.push(format!("Yield_MA{}", ma.window));
        header.push(format!("Spread_MA{}", ma.window));
    }
    writer.write_record(&header)?;

    for (i, point) in history.points.iter().enumerate() {
        let mut record = vec![
            point.date.format("%Y-%m-%d").to_string(),
            format!("{:.4}", point.swap),
            format!("{:.4}", point.yield_30y),
            format!("{:.4}", point.spread),
        ];
        for ma in &history.moving_averages {
            record.push(format!("{:.4}", ma.yield_ma[i]));
            record.push(format!("{:.4}", ma.spread_ma[i]));
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|source| RateLogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), points = history.points.len(), "Exported spread history");
    Ok(())
}
