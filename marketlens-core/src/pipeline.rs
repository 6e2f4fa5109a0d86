//! Pipeline entry point: candles in, report out.
//!
//! indicators (daily + 4h) → score → regime → report. Either the whole run
//! succeeds or an error is returned; no partial report is produced.

use crate::config::IndicatorConfig;
use crate::domain::{CandleSeries, Interval};
use crate::error::AnalysisError;
use crate::indicators::IndicatorEngine;
use crate::regime::RegimeClassifier;
use crate::report::{compose, Report, ReportInputs};
use crate::scoring::{score, ScoreInputs};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Stateless analyzer built from indicator configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    engine: IndicatorEngine,
    classifier: RegimeClassifier,
}

impl Analyzer {
    /// Fails with `InvalidConfig` when a period is zero or the EMAs are inverted.
    pub fn new(config: &IndicatorConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            engine: IndicatorEngine::new(config)?,
            classifier: RegimeClassifier::default(),
        })
    }

    pub fn analyze(
        &self,
        symbol: &str,
        daily: &CandleSeries,
        h4: &CandleSeries,
        as_of: DateTime<Utc>,
    ) -> Result<Report, AnalysisError> {
        check_series(symbol, daily, Interval::Daily)?;
        check_series(symbol, h4, Interval::FourHour)?;

        let daily_snap = self.engine.snapshot(daily)?;
        let h4_snap = self.engine.snapshot(h4)?;
        let bands = self.engine.bands(daily)?;
        debug!(symbol, ?bands, "swing bands");

        let higher_trend = h4_snap.trend();
        let price_score = score(&ScoreInputs {
            close: daily_snap.close,
            ema_slow: daily_snap.ema_slow,
            rsi: daily_snap.rsi,
            atr: daily_snap.atr,
            higher_trend,
        });
        debug!(
            symbol,
            score = price_score.value(),
            h4_trend = higher_trend.label(),
            "scored"
        );

        let verdict = self.classifier.classify(daily, &daily_snap)?;
        debug!(symbol, metrics = ?verdict.metrics, "regime metrics");

        let report = compose(ReportInputs {
            symbol,
            as_of,
            daily: &daily_snap,
            h4: &h4_snap,
            score: price_score,
            verdict: &verdict,
            bands,
        });

        info!(
            symbol,
            state = %report.state,
            score = report.score.value(),
            trend = report.trend.label(),
            "analysis complete"
        );
        Ok(report)
    }
}

/// Run one full analysis with the given indicator configuration.
pub fn analyze(
    config: &IndicatorConfig,
    symbol: &str,
    daily: &CandleSeries,
    h4: &CandleSeries,
    as_of: DateTime<Utc>,
) -> Result<Report, AnalysisError> {
    Analyzer::new(config)?.analyze(symbol, daily, h4, as_of)
}

fn check_series(
    symbol: &str,
    series: &CandleSeries,
    expected: Interval,
) -> Result<(), AnalysisError> {
    if series.symbol() != symbol {
        return Err(AnalysisError::SeriesMismatch(format!(
            "expected {symbol} candles, got {}",
            series.symbol()
        )));
    }
    if series.interval() != expected {
        return Err(AnalysisError::SeriesMismatch(format!(
            "expected {expected} candles for {symbol}, got {}",
            series.interval()
        )));
    }
    Ok(())
}
