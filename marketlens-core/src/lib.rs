//! MarketLens Core: market-structure analysis over OHLCV candles.
//!
//! This crate contains the analysis engine:
//! - Domain types (candles, validated candle series)
//! - Indicators (EMA, Wilder RSI, Wilder ATR, swing support/resistance bands)
//! - Additive 0-10 price-action score
//! - Rule-based regime classifier (breakout, breakdown, accumulation, distribution, neutral)
//! - Report composition and text renderers
//! - Configuration and market data providers
//!
//! Everything under `indicators`, `scoring`, `regime`, `report` and `pipeline`
//! is synchronous and side-effect free.

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod regime;
pub mod report;
pub mod scoring;

pub use config::{AppConfig, ConfigError, IndicatorConfig};
pub use error::AnalysisError;
pub use pipeline::{analyze, Analyzer};
