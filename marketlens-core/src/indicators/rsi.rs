//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Seed: mean gain / mean loss over the changes at indices 1..=period.
//! Values before index `period` are undefined (`None`).
//! Edge case: avg_loss == 0 → RSI = 100, even when avg_gain is also 0.

use super::Indicator;
use crate::domain::Candle;
use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    type Output = Vec<Option<f64>>;

    fn name(&self) -> &str {
        &self.name
    }

    fn required_len(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> Result<Vec<Option<f64>>, AnalysisError> {
        self.ensure_len(candles.len())?;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        Ok(rsi_of_series(&closes, self.period))
    }
}

/// Wilder RSI over a raw value slice. Shorter-than-`period + 1` input yields all `None`.
pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss -= delta;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    result[period] = Some(compute_rsi(avg_gain, avg_loss));

    let p = period as f64;
    for i in (period + 1)..n {
        let delta = values[i] - values[i - 1];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;

        result[i] = Some(compute_rsi(avg_gain, avg_loss));
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles};

    #[test]
    fn rsi_all_gains() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&candles).unwrap();
        assert_eq!(result[3], Some(100.0));
        assert_eq!(result[5], Some(100.0));
    }

    #[test]
    fn rsi_all_losses() {
        let candles = make_candles(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&candles).unwrap();
        assert_approx(result[3].unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_series_reports_100() {
        let result = rsi_of_series(&[50.0; 10], 3);
        assert!(result[3..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn rsi_mixed_known_values() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // Seed (period 3): avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100/(1 + 0.34/0.73)
        // Next: avg_gain = (0.34/3*2 + 0.72)/3, avg_loss = (0.73/3*2)/3
        let values = [44.0, 44.34, 44.09, 43.61, 44.33];
        let result = rsi_of_series(&values, 3);

        assert!(result[..3].iter().all(Option::is_none));

        let seed_gain = (44.34 - 44.0) / 3.0;
        let seed_loss = ((44.34 - 44.09) + (44.09 - 43.61)) / 3.0;
        let expected_seed = 100.0 - 100.0 / (1.0 + seed_gain / seed_loss);
        assert_approx(result[3].unwrap(), expected_seed, 1e-9);

        let gain = (seed_gain * 2.0 + (44.33 - 43.61)) / 3.0;
        let loss = (seed_loss * 2.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + gain / loss);
        assert_approx(result[4].unwrap(), expected, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let values = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for (i, v) in rsi_of_series(&values, 3).into_iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_requires_period_plus_one() {
        let candles = make_candles(&[1.0; 14]);
        let err = Rsi::new(14).compute(&candles).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { required: 15, actual: 14, .. }
        ));
    }
}
