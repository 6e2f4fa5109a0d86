//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = k * value[t] + (1 - k) * EMA[t-1], k = 2 / (period + 1).
//! Seed: EMA[0] = value[0], not the SMA of the first `period` values. This
//! biases the early part of the series; only the tail is read downstream, so
//! reuse elsewhere should keep the deviation from textbook EMA in mind.
//! Output length equals input length.

use super::Indicator;
use crate::domain::Candle;
use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    type Output = Vec<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn required_len(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Result<Vec<f64>, AnalysisError> {
        self.ensure_len(candles.len())?;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        Ok(ema_of_series(&closes, self.period))
    }
}

/// Compute raw EMA values from a pre-extracted f64 slice.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    result.push(seed);

    let mut prev = seed;
    for &v in &values[1..] {
        let ema = v * k + prev * (1.0 - k);
        result.push(ema);
        prev = ema;
    }

    result
}
