//! Market data provider trait and structured error types.
//!
//! The `MarketDataProvider` trait abstracts over candle sources (exchange REST
//! API, CSV files) so the CLI can swap implementations and tests can stay
//! offline. Providers never retry; a failed fetch fails the run for that symbol.

use crate::domain::{CandleSeries, Interval};
use crate::error::AnalysisError;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("no candle file at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Series(#[from] AnalysisError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Trait for candle sources.
///
/// Implementations must return candles oldest-to-newest.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the most recent `limit` candles for `symbol` at `interval`.
    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<CandleSeries, FetchError>;
}
