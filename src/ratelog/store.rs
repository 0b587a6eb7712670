//! Upsert-by-date CSV store

use super::RateLogError;
use crate::telemetry::{record_dropped_rows, record_log_upsert};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A dated row in a rate log
pub trait Observation: Serialize + DeserializeOwned + Clone {
    /// Log family name used in metrics
    const NAME: &'static str;

    fn date(&self) -> NaiveDate;
}

/// Row count and date span of a log
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LogSummary {
    pub name: String,
    pub path: PathBuf,
    pub points: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
}

/// CSV file holding at most one observation per date, sorted ascending
#[derive(Debug, Clone)]
pub struct RateLog<T> {
    path: PathBuf,
    _row: PhantomData<T>,
}

impl<T: Observation> RateLog<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all rows
    ///
    /// A missing file is an empty log. Rows that fail to parse are dropped.
    /// Repeated dates collapse to the last one in file order.
    pub fn load(&self) -> Result<Vec<T>, RateLogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if !headers.is_empty() && !headers.iter().any(|h| h == "Date") {
            return Err(RateLogError::MissingDateColumn(
                self.path.display().to_string(),
            ));
        }

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for result in reader.deserialize::<T>() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    dropped += 1;
                    tracing::debug!(path = %self.path.display(), error = %e, "Dropping malformed row");
                }
            }
        }

        if dropped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                dropped,
                "Dropped malformed rows from rate log"
            );
            record_dropped_rows(T::NAME, dropped);
        }

        Ok(collapse(rows))
    }

    /// Insert or replace the row for `observation`'s date and persist
    ///
    /// Returns the rows as written.
    pub fn upsert(&self, observation: T) -> Result<Vec<T>, RateLogError> {
        let date = observation.date();
        let mut rows = self.load()?;
        rows.push(observation);
        let rows = collapse(rows);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RateLogError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|source| RateLogError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        tracing::info!(
            path = %self.path.display(),
            %date,
            rows = rows.len(),
            "Rate observation saved"
        );
        record_log_upsert(T::NAME, rows.len());

        Ok(rows)
    }

    pub fn latest_date(&self) -> Result<Option<NaiveDate>, RateLogError> {
        Ok(self.load()?.last().map(Observation::date))
    }

    pub fn summary(&self) -> Result<LogSummary, RateLogError> {
        let rows = self.load()?;
        Ok(LogSummary {
            name: T::NAME.to_string(),
            path: self.path.clone(),
            points: rows.len(),
            first: rows.first().map(Observation::date),
            last: rows.last().map(Observation::date),
        })
    }
}

/// Keep the last row per date, ascending by date
fn collapse<T: Observation>(rows: impl IntoIterator<Item = T>) -> Vec<T> {
    let by_date: BTreeMap<NaiveDate, T> = rows.into_iter().map(|r| (r.date(), r)).collect();
    by_date.into_values().collect()
}
