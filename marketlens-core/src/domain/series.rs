//! Validated, immutable candle series for one symbol and interval.

use super::candle::{Candle, Interval};
use crate::error::AnalysisError;
use serde::Serialize;

/// Ordered candles, oldest first, with strictly increasing timestamps.
///
/// Fields are private: a `CandleSeries` only exists once every candle has
/// passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    symbol: String,
    interval: Interval,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        candles: Vec<Candle>,
    ) -> Result<Self, AnalysisError> {
        for (index, candle) in candles.iter().enumerate() {
            candle
                .check()
                .map_err(|reason| AnalysisError::InvalidCandle { index, reason })?;
        }
        for (index, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(AnalysisError::InvalidCandle {
                    index: index + 1,
                    reason: format!(
                        "timestamp {} not after previous {}",
                        pair[1].timestamp, pair[0].timestamp
                    ),
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            interval,
            candles,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// The trailing `n` candles (the whole series if shorter).
    pub fn tail(&self, n: usize) -> &[Candle] {
        &self.candles[self.candles.len().saturating_sub(n)..]
    }
}
