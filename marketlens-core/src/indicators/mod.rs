//! Indicator engine: EMA, RSI, ATR and swing support/resistance bands.
//!
//! Indicators are pure functions: candle history in, numeric series out.
//! Each one declares the minimum series length it needs and refuses shorter
//! input with `AnalysisError::InsufficientData` instead of returning a
//! degraded result.

pub mod atr;
pub mod ema;
pub mod engine;
pub mod rsi;
pub mod snapshot;
pub mod swing;

pub use atr::{atr_of_candles, true_range, Atr};
pub use ema::{ema_of_series, Ema};
pub use engine::IndicatorEngine;
pub use rsi::{rsi_of_series, Rsi};
pub use snapshot::{IndicatorSnapshot, Trend};
pub use swing::{swing_levels, SupportResistanceBands, SwingLevels};

use crate::domain::{Candle, CandleSeries};
use crate::error::AnalysisError;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    type Output;

    /// Human-readable name (e.g., "ema_20", "atr_14").
    fn name(&self) -> &str;

    /// Minimum number of candles the indicator accepts.
    fn required_len(&self) -> usize;

    /// Compute over the full candle slice, oldest first.
    fn compute(&self, candles: &[Candle]) -> Result<Self::Output, AnalysisError>;

    /// Fail with `InsufficientData` when `actual` is below `required_len()`.
    fn ensure_len(&self, actual: usize) -> Result<(), AnalysisError> {
        if actual < self.required_len() {
            return Err(AnalysisError::insufficient(
                self.name(),
                self.required_len(),
                actual,
            ));
        }
        Ok(())
    }

    /// Length-guarded `compute` over a validated series.
    fn evaluate(&self, series: &CandleSeries) -> Result<Self::Output, AnalysisError> {
        self.ensure_len(series.len())?;
        self.compute(series.candles())
    }
}

/// Last defined value of a warmup-padded series.
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
