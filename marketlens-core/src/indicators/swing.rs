//! Swing support/resistance bands.
//!
//! Over the last `lookback` candles: hi = max high, lo = min low.
//! Resistance = {hi, midpoint(hi, last_close)} ascending.
//! Support = {lo, midpoint(lo, last_close)} descending.
//! Two-tier interpolation between the extreme and the current price; there is
//! no pivot detection.

use super::Indicator;
use crate::domain::Candle;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Two resistance and two support prices, nearest band first.
///
/// Invariant: `resistance[0] <= resistance[1]` and `support[0] >= support[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceBands {
    pub resistance: [f64; 2],
    pub support: [f64; 2],
}

impl SupportResistanceBands {
    fn from_levels(hi: f64, lo: f64, last_close: f64) -> Self {
        let mut resistance = [hi, (hi + last_close) / 2.0];
        resistance.sort_by(f64::total_cmp);
        let mut support = [lo, (lo + last_close) / 2.0];
        support.sort_by(|a, b| b.total_cmp(a));
        Self {
            resistance,
            support,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwingLevels {
    lookback: usize,
    name: String,
}

impl SwingLevels {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "swing lookback must be >= 1");
        Self {
            lookback,
            name: format!("swing_{lookback}"),
        }
    }
}

impl Indicator for SwingLevels {
    type Output = SupportResistanceBands;

    fn name(&self) -> &str {
        &self.name
    }

    fn required_len(&self) -> usize {
        self.lookback
    }

    fn compute(&self, candles: &[Candle]) -> Result<SupportResistanceBands, AnalysisError> {
        self.ensure_len(candles.len())?;
        swing_levels(candles, self.lookback)
            .ok_or_else(|| AnalysisError::insufficient(&self.name, self.lookback, 0))
    }
}

/// Bands over the trailing `lookback` candles; `None` for an empty slice.
pub fn swing_levels(candles: &[Candle], lookback: usize) -> Option<SupportResistanceBands> {
    let window = &candles[candles.len().saturating_sub(lookback)..];
    let last_close = window.last()?.close;
    let hi = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let lo = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    Some(SupportResistanceBands::from_levels(hi, lo, last_close))
}
