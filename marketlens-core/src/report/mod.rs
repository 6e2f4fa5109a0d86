//! Structured analysis report and its output adapters.
//!
//! - `Report`: immutable result of one analysis run.
//! - `composer`: pure aggregation of indicator, score and regime outputs.
//! - `render`: text layouts for delivery channels.

pub mod composer;
pub mod render;

pub use composer::{compose, ReportInputs};
pub use render::{fmt_pct, fmt_price, MarkdownRenderer, PlainTextRenderer, ReportRenderer};

use crate::domain::Symbol;
use crate::indicators::{SupportResistanceBands, Trend};
use crate::regime::{MarketState, RegimeMetrics};
use crate::scoring::PriceActionScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Momentum label derived from RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Overbought,
    Bullish,
    Neutral,
    Bearish,
    Oversold,
}

impl Momentum {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi >= 70.0 {
            Momentum::Overbought
        } else if rsi >= 60.0 {
            Momentum::Bullish
        } else if rsi <= 30.0 {
            Momentum::Oversold
        } else if rsi <= 40.0 {
            Momentum::Bearish
        } else {
            Momentum::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Momentum::Overbought => "overbought",
            Momentum::Bullish => "bullish",
            Momentum::Neutral => "neutral",
            Momentum::Bearish => "bearish",
            Momentum::Oversold => "oversold",
        }
    }
}

/// ATR in price units and as a percentage of close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    pub atr: f64,
    pub atr_pct: f64,
}

/// Result of one analysis run. Built by `compose`, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub symbol: Symbol,
    pub as_of: DateTime<Utc>,
    /// Daily trend.
    pub trend: Trend,
    /// 4-hour trend, also fed into the score.
    pub h4_trend: Trend,
    pub momentum: Momentum,
    pub score: PriceActionScore,
    pub state: MarketState,
    pub rationale: String,
    pub bands: SupportResistanceBands,
    pub volatility: Volatility,
    pub last_close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub regime: RegimeMetrics,
}

impl Report {
    /// blake3 digest over every field except `as_of`.
    ///
    /// Two runs over identical candles produce the same fingerprint.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.remove("as_of");
        }
        let canonical = serde_json::to_string(&value)?;
        Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
    }
}
