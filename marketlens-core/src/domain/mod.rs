//! Domain types for MarketLens

pub mod candle;
pub mod series;

pub use candle::{Candle, Interval};
pub use series::CandleSeries;

/// Symbol type alias
pub type Symbol = String;
