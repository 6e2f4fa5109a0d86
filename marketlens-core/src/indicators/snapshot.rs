//! Read-only view of the last indicator values for one series.

use crate::domain::Interval;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trend direction derived from close vs. the fast and slow EMAs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[serde(rename = "side")]
    Sideways,
}

impl Trend {
    /// Up when close > fast > slow, Down when close < fast < slow.
    pub fn from_emas(close: f64, ema_fast: f64, ema_slow: f64) -> Self {
        if close > ema_fast && ema_fast > ema_slow {
            Trend::Up
        } else if close < ema_fast && ema_fast < ema_slow {
            Trend::Down
        } else {
            Trend::Sideways
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Sideways => "side",
        }
    }
}

/// Last computed indicator values keyed by indicator name, plus the fast EMA
/// backing series for slope lookups.
///
/// Built once per analysis by `IndicatorEngine::snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub interval: Interval,
    pub close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub atr: f64,
    ema_fast_series: Vec<f64>,
    values: BTreeMap<String, f64>,
}

impl IndicatorSnapshot {
    pub(crate) fn new(
        interval: Interval,
        close: f64,
        named: [(&str, f64); 4],
        ema_fast_series: Vec<f64>,
    ) -> Self {
        let [(_, ema_fast), (_, ema_slow), (_, rsi), (_, atr)] = named;
        Self {
            interval,
            close,
            ema_fast,
            ema_slow,
            rsi,
            atr,
            ema_fast_series,
            values: named.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Last value of a named indicator (e.g. "ema_50", "rsi_14").
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Indicator names held by this snapshot.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Fast EMA `bars_back` bars before the latest one.
    pub fn ema_fast_lagged(&self, bars_back: usize) -> Option<f64> {
        let n = self.ema_fast_series.len();
        n.checked_sub(bars_back + 1).map(|i| self.ema_fast_series[i])
    }

    pub fn trend(&self) -> Trend {
        Trend::from_emas(self.close, self.ema_fast, self.ema_slow)
    }

    pub fn atr_pct(&self) -> f64 {
        self.atr / self.close * 100.0
    }
}
