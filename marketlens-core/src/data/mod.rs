//! Market data providers

pub mod binance;
pub mod csv_source;
pub mod provider;

pub use binance::{parse_klines, BinanceProvider};
pub use csv_source::{candle_path, save_series, CsvProvider};
pub use provider::{FetchError, MarketDataProvider};
