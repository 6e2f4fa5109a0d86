//! Runs the configured indicator set over a candle series.

use super::{
    last_defined, Atr, Ema, Indicator, IndicatorSnapshot, Rsi, SupportResistanceBands,
    SwingLevels,
};
use crate::config::IndicatorConfig;
use crate::domain::CandleSeries;
use crate::error::AnalysisError;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    ema_fast: Ema,
    ema_slow: Ema,
    rsi: Rsi,
    atr: Atr,
    swing: SwingLevels,
}

impl IndicatorEngine {
    /// Build the indicator set, rejecting zero or inverted periods.
    pub fn new(config: &IndicatorConfig) -> Result<Self, AnalysisError> {
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &IndicatorConfig) -> Self {
        Self {
            ema_fast: Ema::new(config.ema_fast),
            ema_slow: Ema::new(config.ema_slow),
            rsi: Rsi::new(config.rsi_period),
            atr: Atr::new(config.atr_period),
            swing: SwingLevels::new(config.swing_lookback),
        }
    }

    /// Compute fast/slow EMA, RSI and ATR and keep their last values.
    ///
    /// Fails on the first indicator whose lookback the series cannot cover.
    pub fn snapshot(&self, series: &CandleSeries) -> Result<IndicatorSnapshot, AnalysisError> {
        let ema_fast = self.ema_fast.evaluate(series)?;
        let ema_slow = self.ema_slow.evaluate(series)?;
        let rsi = self.rsi.evaluate(series)?;
        let atr = self.atr.evaluate(series)?;

        let actual = series.len();
        let close = series
            .last()
            .map(|c| c.close)
            .ok_or_else(|| AnalysisError::insufficient("close", 1, actual))?;
        let ema_fast_last = ema_fast.last().copied().ok_or_else(|| {
            AnalysisError::insufficient(self.ema_fast.name(), self.ema_fast.required_len(), actual)
        })?;
        let ema_slow_last = ema_slow.last().copied().ok_or_else(|| {
            AnalysisError::insufficient(self.ema_slow.name(), self.ema_slow.required_len(), actual)
        })?;
        let rsi_last = last_defined(&rsi).ok_or_else(|| {
            AnalysisError::insufficient(self.rsi.name(), self.rsi.required_len(), actual)
        })?;
        let atr_last = last_defined(&atr).ok_or_else(|| {
            AnalysisError::insufficient(self.atr.name(), self.atr.required_len(), actual)
        })?;

        debug!(
            symbol = series.symbol(),
            interval = %series.interval(),
            close,
            ema_fast = ema_fast_last,
            ema_slow = ema_slow_last,
            rsi = rsi_last,
            atr = atr_last,
            "indicator snapshot"
        );

        Ok(IndicatorSnapshot::new(
            series.interval(),
            close,
            [
                (self.ema_fast.name(), ema_fast_last),
                (self.ema_slow.name(), ema_slow_last),
                (self.rsi.name(), rsi_last),
                (self.atr.name(), atr_last),
            ],
            ema_fast,
        ))
    }

    /// Swing support/resistance bands over the configured lookback.
    pub fn bands(&self, series: &CandleSeries) -> Result<SupportResistanceBands, AnalysisError> {
        self.swing.evaluate(series)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::from_valid(&IndicatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandleSeries, Interval};
    use crate::indicators::make_candles;

    fn rising_series(n: usize) -> CandleSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        CandleSeries::new("BTCUSDT", Interval::Daily, make_candles(&closes)).unwrap()
    }

    #[test]
    fn snapshot_holds_named_last_values() {
        let engine = IndicatorEngine::default();
        let snap = engine.snapshot(&rising_series(80)).unwrap();
        assert_eq!(snap.close, 179.0);
        assert_eq!(snap.get("ema_20"), Some(snap.ema_fast));
        assert_eq!(snap.get("ema_50"), Some(snap.ema_slow));
        assert_eq!(snap.get("rsi_14"), Some(100.0));
        // high - low is a constant 3.0 once the series rises by 1.0 per bar
        assert!((snap.atr - 3.0).abs() < 1e-9);
        assert_eq!(snap.ema_fast_lagged(79), Some(100.0));
        assert_eq!(snap.ema_fast_lagged(80), None);
        assert!(snap.ema_fast > snap.ema_slow);
    }

    #[test]
    fn snapshot_rejects_series_shorter_than_slow_ema() {
        let engine = IndicatorEngine::default();
        let err = engine.snapshot(&rising_series(49)).unwrap_err();
        assert_eq!(err, AnalysisError::insufficient("ema_50", 50, 49));
    }

    #[test]
    fn zero_period_is_a_config_error() {
        let config = IndicatorConfig {
            rsi_period: 0,
            ..IndicatorConfig::default()
        };
        let err = IndicatorEngine::new(&config).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(msg) if msg.contains("rsi_period")));
    }

    #[test]
    fn bands_need_sixty_candles() {
        let engine = IndicatorEngine::default();
        assert!(engine.bands(&rising_series(59)).is_err());
        let bands = engine.bands(&rising_series(60)).unwrap();
        assert!(bands.resistance[0] <= bands.resistance[1]);
    }
}
