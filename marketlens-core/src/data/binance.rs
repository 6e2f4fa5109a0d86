//! Binance spot klines provider.
//!
//! Fetches candles from `/api/v3/klines`. The payload is an array of arrays:
//! `[open_time_ms, open, high, low, close, volume, close_time_ms, ...]` with
//! prices and volume encoded as strings. No retries; a failed request
//! surfaces as `FetchError` and the caller skips the symbol.

use super::provider::{FetchError, MarketDataProvider};
use crate::domain::{Candle, CandleSeries, Interval};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Hard cap the endpoint accepts per request.
const MAX_LIMIT: usize = 1000;

pub struct BinanceProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BinanceProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("marketlens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the klines URL for a symbol, interval and limit.
    fn klines_url(&self, symbol: &str, interval: Interval, limit: usize) -> String {
        format!(
            "{}/api/v3/klines?symbol={symbol}&interval={}&limit={}",
            self.base_url,
            interval.code(),
            limit.min(MAX_LIMIT)
        )
    }
}

impl MarketDataProvider for BinanceProvider {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<CandleSeries, FetchError> {
        let url = self.klines_url(symbol, interval, limit);
        debug!(%url, "requesting klines");

        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_klines(symbol, interval, &body)
    }
}

/// Parse a klines response body into a validated series.
pub fn parse_klines(
    symbol: &str,
    interval: Interval,
    body: &str,
) -> Result<CandleSeries, FetchError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| FetchError::ResponseFormat(format!("klines payload: {e}")))?;

    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            parse_row(row).map_err(|e| FetchError::ResponseFormat(format!("row {i}: {e}")))
        })
        .collect::<Result<Vec<Candle>, FetchError>>()?;

    Ok(CandleSeries::new(symbol, interval, candles)?)
}

fn parse_row(row: &[Value]) -> Result<Candle, String> {
    if row.len() < 6 {
        return Err(format!("expected at least 6 fields, got {}", row.len()));
    }
    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| "open time is not an integer".to_string())?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(open_time)
        .ok_or_else(|| format!("open time {open_time} out of range"))?;

    Ok(Candle {
        timestamp,
        open: decimal_field(&row[1], "open")?,
        high: decimal_field(&row[2], "high")?,
        low: decimal_field(&row[3], "low")?,
        close: decimal_field(&row[4], "close")?,
        volume: decimal_field(&row[5], "volume")?,
    })
}

/// Prices come as decimal strings; accept bare numbers too.
fn decimal_field(value: &Value, name: &str) -> Result<f64, String> {
    match value {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| format!("{name} '{s}' is not a number: {e}")),
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{name} is not a finite number")),
        other => Err(format!("{name} has unexpected type: {other}")),
    }
}
