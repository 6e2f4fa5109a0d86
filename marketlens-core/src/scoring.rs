//! Additive 0–10 price-action score.
//!
//! Fixed empirical weights and thresholds, starting from a baseline of 5:
//! - close vs slow EMA: +2 above, -2 otherwise (equality counts as not above)
//! - RSI: +1.5 at or above 60, -1.5 at or below 40
//! - volatility (ATR as % of close): -1 at or above 6%, +0.5 at or below 3%
//! - higher-timeframe trend: +1 up, -1 down
//!
//! The result is clamped to [0, 10].

use crate::indicators::Trend;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASELINE: f64 = 5.0;
const EMA_WEIGHT: f64 = 2.0;
const RSI_WEIGHT: f64 = 1.5;
const RSI_BULLISH: f64 = 60.0;
const RSI_BEARISH: f64 = 40.0;
const VOL_HIGH_PCT: f64 = 6.0;
const VOL_LOW_PCT: f64 = 3.0;
const VOL_HIGH_PENALTY: f64 = 1.0;
const VOL_LOW_BONUS: f64 = 0.5;
const TREND_WEIGHT: f64 = 1.0;

/// Price-action score, always within [0, 10].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceActionScore(f64);

impl PriceActionScore {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Clamp any raw value into range. NaN maps to the minimum.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(Self::MIN);
        }
        Self(raw.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for PriceActionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/10", self.0)
    }
}

/// Inputs to `score`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub close: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub atr: f64,
    pub higher_trend: Trend,
}

/// ATR as a percentage of close; 0 when ATR is zero or NaN.
pub fn volatility_pct(atr: f64, close: f64) -> f64 {
    if atr == 0.0 || atr.is_nan() {
        0.0
    } else {
        atr / close * 100.0
    }
}

pub fn score(inputs: &ScoreInputs) -> PriceActionScore {
    let mut s = BASELINE;

    s += if inputs.close > inputs.ema_slow {
        EMA_WEIGHT
    } else {
        -EMA_WEIGHT
    };

    if inputs.rsi >= RSI_BULLISH {
        s += RSI_WEIGHT;
    } else if inputs.rsi <= RSI_BEARISH {
        s -= RSI_WEIGHT;
    }

    let vol_pct = volatility_pct(inputs.atr, inputs.close);
    if vol_pct >= VOL_HIGH_PCT {
        s -= VOL_HIGH_PENALTY;
    } else if vol_pct <= VOL_LOW_PCT {
        s += VOL_LOW_BONUS;
    }

    s += match inputs.higher_trend {
        Trend::Up => TREND_WEIGHT,
        Trend::Down => -TREND_WEIGHT,
        Trend::Sideways => 0.0,
    };

    PriceActionScore::new(s)
}
