//! CSV candle files: `<dir>/<SYMBOL>_<interval>.csv`.
//!
//! Header: `timestamp,open,high,low,close,volume`, timestamp in RFC 3339.

use super::provider::{FetchError, MarketDataProvider};
use crate::domain::{Candle, CandleSeries, Interval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<CsvRow> for Candle {
    fn from(row: CsvRow) -> Self {
        Candle {
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

impl From<&Candle> for CsvRow {
    fn from(c: &Candle) -> Self {
        CsvRow {
            timestamp: c.timestamp,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        }
    }
}

/// Reads candle series from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str, interval: Interval) -> PathBuf {
        candle_path(&self.dir, symbol, interval)
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<CandleSeries, FetchError> {
        let path = self.path_for(symbol, interval);
        if !path.exists() {
            return Err(FetchError::NotFound { path });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut candles = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            candles.push(Candle::from(row?));
        }
        let skip = candles.len().saturating_sub(limit);
        let candles = candles.split_off(skip);

        debug!(symbol, %interval, path = %path.display(), count = candles.len(), "loaded candles");
        Ok(CandleSeries::new(symbol, interval, candles)?)
    }
}

/// File name convention shared by the provider and `save_series`.
pub fn candle_path(dir: &Path, symbol: &str, interval: Interval) -> PathBuf {
    dir.join(format!("{symbol}_{}.csv", interval.code()))
}

/// Write a series to `<dir>/<SYMBOL>_<interval>.csv`, creating `dir` if needed.
pub fn save_series(dir: &Path, series: &CandleSeries) -> Result<PathBuf, FetchError> {
    std::fs::create_dir_all(dir).map_err(|source| FetchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = candle_path(dir, series.symbol(), series.interval());
    let mut writer = csv::Writer::from_path(&path)?;
    for candle in series.candles() {
        writer.serialize(CsvRow::from(candle))?;
    }
    writer.flush().map_err(|source| FetchError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
