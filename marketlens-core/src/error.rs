//! Error taxonomy for the analysis core.
//!
//! Every variant is fatal for the current run: the caller skips the report
//! rather than substituting defaults.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data for {indicator}: need {required} candles, got {actual}")]
    InsufficientData {
        indicator: String,
        required: usize,
        actual: usize,
    },

    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("series mismatch: {0}")]
    SeriesMismatch(String),

    /// Indicator configuration rejected before any computation ran.
    #[error("{0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub(crate) fn insufficient(indicator: &str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            indicator: indicator.to_string(),
            required,
            actual,
        }
    }
}
