//! Report composition: pure aggregation, no I/O.

use super::{Momentum, Report, Volatility};
use crate::indicators::{IndicatorSnapshot, SupportResistanceBands};
use crate::regime::RegimeVerdict;
use crate::scoring::{volatility_pct, PriceActionScore};
use chrono::{DateTime, Utc};

/// Everything a report is assembled from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub symbol: &'a str,
    pub as_of: DateTime<Utc>,
    pub daily: &'a IndicatorSnapshot,
    pub h4: &'a IndicatorSnapshot,
    pub score: PriceActionScore,
    pub verdict: &'a RegimeVerdict,
    pub bands: SupportResistanceBands,
}

/// Build the report. Deterministic for identical inputs apart from `as_of`,
/// which the caller supplies.
pub fn compose(inputs: ReportInputs<'_>) -> Report {
    let daily = inputs.daily;
    Report {
        symbol: inputs.symbol.to_string(),
        as_of: inputs.as_of,
        trend: daily.trend(),
        h4_trend: inputs.h4.trend(),
        momentum: Momentum::from_rsi(daily.rsi),
        score: inputs.score,
        state: inputs.verdict.state,
        rationale: inputs.verdict.rationale().to_string(),
        bands: inputs.bands,
        volatility: Volatility {
            atr: daily.atr,
            atr_pct: volatility_pct(daily.atr, daily.close),
        },
        last_close: daily.close,
        ema_fast: daily.ema_fast,
        ema_slow: daily.ema_slow,
        rsi: daily.rsi,
        regime: inputs.verdict.metrics,
    }
}
