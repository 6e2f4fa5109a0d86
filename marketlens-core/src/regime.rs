//! Market regime classification.
//!
//! A pure labelling function over the latest daily candle and its trailing
//! window. Nothing is remembered between calls. Rules are evaluated in a fixed
//! order and the first match wins:
//!
//! 1. BREAKOUT: close >= max_high * 0.998 and body >= 0.6%
//! 2. BREAKDOWN: close <= min_low * 1.002 and body >= 0.6%
//! 3. ACCUMULATION: range <= 6% and (|slope| <= 0.35% or ATR <= 3.5%)
//! 4. DISTRIBUTION: close >= slow EMA, slope < 0.1% and ATR >= 4%
//! 5. NEUTRAL

use crate::domain::CandleSeries;
use crate::error::AnalysisError;
use crate::indicators::IndicatorSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

const BREAKOUT_TOLERANCE: f64 = 0.998;
const BREAKDOWN_TOLERANCE: f64 = 1.002;
const MIN_BODY_PCT: f64 = 0.6;
const MAX_RANGE_PCT: f64 = 6.0;
const FLAT_SLOPE_PCT: f64 = 0.35;
const QUIET_ATR_PCT: f64 = 3.5;
const DISTRIBUTION_SLOPE_PCT: f64 = 0.1;
const DISTRIBUTION_ATR_PCT: f64 = 4.0;

/// Labelled market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    Breakout,
    Breakdown,
    Accumulation,
    Distribution,
    Neutral,
}

impl MarketState {
    pub fn label(&self) -> &'static str {
        match self {
            MarketState::Breakout => "BREAKOUT",
            MarketState::Breakdown => "BREAKDOWN",
            MarketState::Accumulation => "ACCUMULATION",
            MarketState::Distribution => "DISTRIBUTION",
            MarketState::Neutral => "NEUTRAL",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            MarketState::Breakout => {
                "Close is pressing the 20-day high with a full-bodied candle; buyers are in control"
            }
            MarketState::Breakdown => {
                "Close is pressing the 20-day low with a full-bodied candle; sellers are in control"
            }
            MarketState::Accumulation => {
                "Tight 20-day range with a flat trend or muted volatility; price is being absorbed"
            }
            MarketState::Distribution => {
                "Price holds above the slow EMA but momentum is stalling under elevated volatility"
            }
            MarketState::Neutral => "No clear structure; wait for range expansion or a retest",
        }
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intermediate quantities the rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeMetrics {
    pub close: f64,
    pub max_high: f64,
    pub min_low: f64,
    pub range_pct: f64,
    pub atr_pct: f64,
    pub slope_pct: f64,
    pub body_pct: f64,
}

impl RegimeMetrics {
    pub fn is_breakout(&self) -> bool {
        self.close >= self.max_high * BREAKOUT_TOLERANCE && self.body_pct >= MIN_BODY_PCT
    }

    pub fn is_breakdown(&self) -> bool {
        self.close <= self.min_low * BREAKDOWN_TOLERANCE && self.body_pct >= MIN_BODY_PCT
    }

    pub fn is_accumulation(&self) -> bool {
        let tight = self.range_pct <= MAX_RANGE_PCT;
        (tight && self.slope_pct.abs() <= FLAT_SLOPE_PCT)
            || (tight && self.atr_pct <= QUIET_ATR_PCT)
    }

    pub fn is_distribution(&self, ema_slow: f64) -> bool {
        self.close >= ema_slow
            && self.slope_pct < DISTRIBUTION_SLOPE_PCT
            && self.atr_pct >= DISTRIBUTION_ATR_PCT
    }

    /// Apply the rules in order; first match wins.
    pub fn classify(&self, ema_slow: f64) -> MarketState {
        if self.is_breakout() {
            MarketState::Breakout
        } else if self.is_breakdown() {
            MarketState::Breakdown
        } else if self.is_accumulation() {
            MarketState::Accumulation
        } else if self.is_distribution(ema_slow) {
            MarketState::Distribution
        } else {
            MarketState::Neutral
        }
    }
}

/// Outcome of one classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeVerdict {
    pub state: MarketState,
    pub metrics: RegimeMetrics,
}

impl RegimeVerdict {
    pub fn rationale(&self) -> &'static str {
        self.state.rationale()
    }
}

/// Percent change from `before` to `now`; 0 when `before` is 0.
fn percent_change(now: f64, before: f64) -> f64 {
    if before == 0.0 {
        0.0
    } else {
        (now - before) / before * 100.0
    }
}

/// Classifies the latest daily candle against its trailing window.
///
/// The slope is read from the snapshot's fast EMA series, so the snapshot
/// must come from the same series being classified.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    window: usize,
    slope_lag: usize,
}

impl Default for RegimeClassifier {
    fn default() -> Self {
        Self {
            window: 20,
            slope_lag: 5,
        }
    }
}

impl RegimeClassifier {
    pub fn required_len(&self) -> usize {
        self.window.max(self.slope_lag + 1)
    }

    /// Measure the trailing window of `series`.
    pub fn metrics(
        &self,
        series: &CandleSeries,
        snapshot: &IndicatorSnapshot,
    ) -> Result<RegimeMetrics, AnalysisError> {
        let required = self.required_len();
        let last = match series.last() {
            Some(last) if series.len() >= required => *last,
            _ => return Err(AnalysisError::insufficient("regime", required, series.len())),
        };
        if snapshot.interval != series.interval() || snapshot.close != last.close {
            return Err(AnalysisError::SeriesMismatch(format!(
                "snapshot ({} close {}) does not describe {} {} (close {})",
                snapshot.interval,
                snapshot.close,
                series.symbol(),
                series.interval(),
                last.close
            )));
        }

        let window = series.tail(self.window);
        let max_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let close = last.close;

        let before = snapshot
            .ema_fast_lagged(self.slope_lag)
            .ok_or_else(|| AnalysisError::insufficient("regime", required, series.len()))?;
        let slope_pct = percent_change(snapshot.ema_fast, before);

        Ok(RegimeMetrics {
            close,
            max_high,
            min_low,
            range_pct: (max_high - min_low) / close * 100.0,
            atr_pct: snapshot.atr / close * 100.0,
            slope_pct,
            body_pct: last.body_pct(),
        })
    }

    /// Label the regime using the snapshot's slow EMA and ATR.
    pub fn classify(
        &self,
        series: &CandleSeries,
        snapshot: &IndicatorSnapshot,
    ) -> Result<RegimeVerdict, AnalysisError> {
        let metrics = self.metrics(series, snapshot)?;
        Ok(RegimeVerdict {
            state: metrics.classify(snapshot.ema_slow),
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, Interval};
    use crate::indicators::{make_candles, IndicatorEngine};

    fn metrics() -> RegimeMetrics {
        RegimeMetrics {
            close: 100.0,
            max_high: 110.0,
            min_low: 90.0,
            range_pct: 20.0,
            atr_pct: 2.0,
            slope_pct: 1.0,
            body_pct: 0.2,
        }
    }

    #[test]
    fn wide_trending_market_is_neutral() {
        assert_eq!(metrics().classify(95.0), MarketState::Neutral);
    }

    #[test]
    fn breakout_needs_body() {
        let m = RegimeMetrics {
            close: 109.8,
            body_pct: 0.6,
            ..metrics()
        };
        assert_eq!(m.classify(95.0), MarketState::Breakout);
        let thin = RegimeMetrics {
            body_pct: 0.59,
            ..m
        };
        assert_eq!(thin.classify(95.0), MarketState::Neutral);
    }

    #[test]
    fn breakdown_near_low() {
        let m = RegimeMetrics {
            close: 90.1,
            body_pct: 1.2,
            ..metrics()
        };
        assert_eq!(m.classify(95.0), MarketState::Breakdown);
    }

    #[test]
    fn accumulation_by_flat_slope_or_quiet_atr() {
        let flat = RegimeMetrics {
            range_pct: 5.0,
            slope_pct: -0.3,
            atr_pct: 5.0,
            ..metrics()
        };
        assert_eq!(flat.classify(95.0), MarketState::Accumulation);

        let quiet = RegimeMetrics {
            range_pct: 6.0,
            slope_pct: 2.0,
            atr_pct: 3.5,
            ..metrics()
        };
        assert_eq!(quiet.classify(95.0), MarketState::Accumulation);

        let wide = RegimeMetrics {
            range_pct: 6.01,
            ..quiet
        };
        assert_ne!(wide.classify(95.0), MarketState::Accumulation);
    }

    #[test]
    fn distribution_above_ema_with_stalling_slope() {
        let m = RegimeMetrics {
            slope_pct: 0.05,
            atr_pct: 4.0,
            ..metrics()
        };
        assert_eq!(m.classify(100.0), MarketState::Distribution);
        assert_eq!(m.classify(100.5), MarketState::Neutral);
    }

    #[test]
    fn breakout_wins_over_accumulation() {
        let m = RegimeMetrics {
            close: 110.0,
            max_high: 110.0,
            min_low: 106.0,
            range_pct: 3.6,
            atr_pct: 1.0,
            slope_pct: 0.0,
            body_pct: 1.0,
        };
        assert!(m.is_accumulation());
        assert_eq!(m.classify(100.0), MarketState::Breakout);
    }

    #[test]
    fn metrics_from_series() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series =
            CandleSeries::new("BTCUSDT", Interval::Daily, make_candles(&closes)).unwrap();
        let snap = IndicatorEngine::default().snapshot(&series).unwrap();
        let m = RegimeClassifier::default().metrics(&series, &snap).unwrap();
        // last 20 candles: closes 140..=159, highs close+1, lows open-1
        assert_eq!(m.close, 159.0);
        assert_eq!(m.max_high, 160.0);
        assert_eq!(m.min_low, 138.0);
        assert!((m.range_pct - 22.0 / 159.0 * 100.0).abs() < 1e-9);
        assert!((m.atr_pct - snap.atr / 159.0 * 100.0).abs() < 1e-9);
        assert!((m.body_pct - 1.0 / 159.0 * 100.0).abs() < 1e-9);
        assert!(m.slope_pct > 0.0);
    }

    #[test]
    fn slope_reads_the_snapshot_lagged_ema() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 9) as f64 * 0.7).collect();
        let series =
            CandleSeries::new("BTCUSDT", Interval::Daily, make_candles(&closes)).unwrap();
        let snap = IndicatorEngine::default().snapshot(&series).unwrap();
        let m = RegimeClassifier::default().metrics(&series, &snap).unwrap();

        let before = snap.ema_fast_lagged(5).unwrap();
        let expected = (snap.ema_fast - before) / before * 100.0;
        assert_eq!(m.slope_pct, expected);
    }

    #[test]
    fn snapshot_from_another_series_is_rejected() {
        let rising: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let flat = vec![100.0; 60];
        let series =
            CandleSeries::new("BTCUSDT", Interval::Daily, make_candles(&rising)).unwrap();
        let other = CandleSeries::new("BTCUSDT", Interval::Daily, make_candles(&flat)).unwrap();
        let snap = IndicatorEngine::default().snapshot(&other).unwrap();
        let err = RegimeClassifier::default()
            .classify(&series, &snap)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SeriesMismatch(_)));
    }

    #[test]
    fn percent_change_guards_zero_base() {
        assert_eq!(percent_change(5.0, 0.0), 0.0);
        assert!((percent_change(101.0, 100.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn short_series_is_rejected() {
        let candles: Vec<Candle> = make_candles(&[100.0; 19]);
        let series = CandleSeries::new("BTCUSDT", Interval::Daily, candles).unwrap();
        let snap = IndicatorSnapshot::new(
            Interval::Daily,
            100.0,
            [
                ("ema_20", 100.0),
                ("ema_50", 100.0),
                ("rsi_14", 50.0),
                ("atr_14", 1.0),
            ],
            vec![100.0; 19],
        );
        let err = RegimeClassifier::default()
            .classify(&series, &snap)
            .unwrap_err();
        assert_eq!(err, AnalysisError::insufficient("regime", 20, 19));
    }

    #[test]
    fn every_state_has_a_rationale() {
        for state in [
            MarketState::Breakout,
            MarketState::Breakdown,
            MarketState::Accumulation,
            MarketState::Distribution,
            MarketState::Neutral,
        ] {
            assert!(!state.rationale().is_empty());
        }
        assert_eq!(
            serde_json::to_string(&MarketState::Accumulation).unwrap(),
            "\"ACCUMULATION\""
        );
    }
}
