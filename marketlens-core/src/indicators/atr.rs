//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), from index 1.
//! Seed: ATR[period] = mean of TR[1..=period].
//! Then Wilder smoothing: ATR[t] = (ATR[t-1] * (period-1) + TR[t]) / period.
//! Values before index `period` are undefined (`None`).

use super::Indicator;
use crate::domain::Candle;
use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    type Output = Vec<Option<f64>>;

    fn name(&self) -> &str {
        &self.name
    }

    fn required_len(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> Result<Vec<Option<f64>>, AnalysisError> {
        self.ensure_len(candles.len())?;
        Ok(atr_of_candles(candles, self.period))
    }
}

/// Compute the True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(candles.len());
    if let Some(first) = candles.first() {
        tr.push(first.high - first.low);
    }
    for pair in candles.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let pc = prev.close;
        tr.push(
            (cur.high - cur.low)
                .max((cur.high - pc).abs())
                .max((cur.low - pc).abs()),
        );
    }
    tr
}

/// Wilder ATR over a candle slice. Shorter-than-`period + 1` input yields all `None`.
pub fn atr_of_candles(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let n = candles.len();
    let mut result = vec![None; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let tr = true_range(candles);

    // TR[0] has no previous close, so the seed window starts at TR[1].
    let seed = tr[1..=period].iter().sum::<f64>() / period as f64;
    result[period] = Some(seed);

    let p = period as f64;
    let mut prev = seed;
    for i in (period + 1)..n {
        let atr = (prev * (p - 1.0) + tr[i]) / p;
        result[i] = Some(atr);
        prev = atr;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::{Duration, TimeZone, Utc};

    fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Candle {
                timestamp: base + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let candles = make_ohlc_candles(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&candles);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let candles = make_ohlc_candles(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        assert_approx(true_range(&candles)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let candles = make_ohlc_candles(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10 (unused)
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = Atr::new(3).compute(&candles).unwrap();

        assert!(result[..3].iter().all(Option::is_none));
        // Seed: mean(8, 9, 6) = 23/3
        // ATR[4] = (23/3 * 2 + 6) / 3 = 64/9
        assert_approx(result[3].unwrap(), 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4].unwrap(), 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_zero_range_stays_zero() {
        let candles = make_ohlc_candles(&[(50.0, 50.0, 50.0, 50.0); 6]);
        let result = atr_of_candles(&candles, 3);
        assert_eq!(result[3], Some(0.0));
        assert_eq!(result[5], Some(0.0));
    }

    #[test]
    fn atr_requires_period_plus_one() {
        let candles = make_ohlc_candles(&[(100.0, 101.0, 99.0, 100.0); 14]);
        let err = Atr::new(14).compute(&candles).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { required: 15, actual: 14, .. }
        ));
    }
}
