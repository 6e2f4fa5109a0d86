//! CSV provider feeding the pipeline: files on disk in, report out.

use chrono::{Duration, TimeZone, Utc};
use marketlens_core::data::{save_series, CsvProvider, FetchError, MarketDataProvider};
use marketlens_core::domain::{Candle, CandleSeries, Interval};
use marketlens_core::{AnalysisError, Analyzer};

fn series(symbol: &str, interval: Interval, n: usize, step: Duration) -> CandleSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = (0..n)
        .map(|i| {
            let close = 2_000.0 + (i as f64 * 0.3).sin() * 40.0 + i as f64;
            let open = close - 5.0;
            Candle {
                timestamp: base + step * i as i32,
                open,
                high: close + 12.0,
                low: open - 12.0,
                close,
                volume: 10.0 + i as f64,
            }
        })
        .collect();
    CandleSeries::new(symbol, interval, candles).unwrap()
}

#[test]
fn analyze_from_csv_directory() {
    let dir = tempfile::tempdir().unwrap();
    save_series(dir.path(), &series("ETHUSDT", Interval::Daily, 240, Duration::days(1))).unwrap();
    save_series(dir.path(), &series("ETHUSDT", Interval::FourHour, 240, Duration::hours(4)))
        .unwrap();

    let provider = CsvProvider::new(dir.path());
    let daily = provider.fetch("ETHUSDT", Interval::Daily, 220).unwrap();
    let h4 = provider.fetch("ETHUSDT", Interval::FourHour, 220).unwrap();
    assert_eq!(daily.len(), 220);
    assert_eq!(h4.len(), 220);

    let as_of = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
    let report = Analyzer::default()
        .analyze("ETHUSDT", &daily, &h4, as_of)
        .unwrap();
    assert_eq!(report.symbol, "ETHUSDT");
    assert_eq!(report.last_close, daily.last().unwrap().close);
}

#[test]
fn too_few_rows_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    save_series(dir.path(), &series("SOLUSDT", Interval::Daily, 40, Duration::days(1))).unwrap();
    save_series(dir.path(), &series("SOLUSDT", Interval::FourHour, 220, Duration::hours(4)))
        .unwrap();

    let provider = CsvProvider::new(dir.path());
    let daily = provider.fetch("SOLUSDT", Interval::Daily, 220).unwrap();
    let h4 = provider.fetch("SOLUSDT", Interval::FourHour, 220).unwrap();

    let err = Analyzer::default()
        .analyze("SOLUSDT", &daily, &h4, Utc::now())
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientData {
            indicator: "ema_50".into(),
            required: 50,
            actual: 40,
        }
    );
}

#[test]
fn missing_interval_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    save_series(dir.path(), &series("BTCUSDT", Interval::Daily, 80, Duration::days(1))).unwrap();

    let err = CsvProvider::new(dir.path())
        .fetch("BTCUSDT", Interval::FourHour, 220)
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound { .. }));
}
