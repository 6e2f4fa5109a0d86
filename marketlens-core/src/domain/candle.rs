//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar interval of a candle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "4h")]
    FourHour,
}

impl Interval {
    /// Venue-style interval code ("1d", "4h").
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::FourHour => "4h",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" | "daily" => Ok(Interval::Daily),
            "4h" | "four_hour" => Ok(Interval::FourHour),
            other => Err(format!("unknown interval '{other}' (expected 1d or 4h)")),
        }
    }
}

/// OHLCV candle for a single symbol over one interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Absolute body size as a percentage of the close.
    pub fn body_pct(&self) -> f64 {
        (self.close - self.open).abs() / self.close * 100.0
    }

    /// Check the OHLCV invariants, returning the first violation found.
    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(format!("{name} is not finite ({value})"));
            }
        }
        if self.open <= 0.0 || self.close <= 0.0 || self.low <= 0.0 {
            return Err("prices must be positive".into());
        }
        if self.volume < 0.0 {
            return Err(format!("negative volume ({})", self.volume));
        }
        if self.high < self.low {
            return Err(format!("high {} below low {}", self.high, self.low));
        }
        if self.high < self.open.max(self.close) {
            return Err(format!(
                "high {} below max(open, close) {}",
                self.high,
                self.open.max(self.close)
            ));
        }
        if self.low > self.open.min(self.close) {
            return Err(format!(
                "low {} above min(open, close) {}",
                self.low,
                self.open.min(self.close)
            ));
        }
        Ok(())
    }
}
