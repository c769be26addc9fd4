//! Integration tests for the Yahoo Finance provider against a mocked chart API

use std::time::Duration;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use etfsignal::core::runtime::{RuntimeConfig, SignalRuntime};
use etfsignal::models::Signal;
use etfsignal::services::market_data::{HistoryInterval, MarketDataProvider};
use etfsignal::services::yahoo::YahooFinanceProvider;
use etfsignal::signals::ThresholdClassifier;
use etfsignal::EngineError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 2024-01-02 14:30 UTC, the NYSE open
const JAN_2_OPEN: i64 = 1_704_205_800;
const DAY: i64 = 86_400;

fn provider(server: &MockServer) -> YahooFinanceProvider {
    YahooFinanceProvider::with_client(server.uri(), reqwest::Client::new())
        .with_retries(1, Duration::from_millis(1))
}

fn since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[tokio::test]
async fn quote_reads_regular_market_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPXL"))
        .and(query_param("range", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "SPXL", "regularMarketPrice": 151.23, "gmtoffset": -18000 },
                    "timestamp": [JAN_2_OPEN],
                    "indicators": { "quote": [{ "close": [150.0] }] }
                }],
                "error": null
            }
        })))
        .mount(&server)
        .await;

    let price = provider(&server).get_quote("SPXL").await.unwrap();
    assert_eq!(price, 151.23);
}

#[tokio::test]
async fn history_pairs_dates_and_skips_null_closes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/TQQQ"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": [{
                    "meta": { "regularMarketPrice": 60.0, "gmtoffset": -18000 },
                    "timestamp": [JAN_2_OPEN, JAN_2_OPEN + DAY, JAN_2_OPEN + 2 * DAY],
                    "indicators": { "quote": [{ "close": [55.5, null, 57.25] }] }
                }],
                "error": null
            }
        })))
        .mount(&server)
        .await;

    let series = provider(&server)
        .get_price_history("TQQQ", since(), HistoryInterval::Daily)
        .await
        .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(series[0].close, 55.5);
    assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    assert_eq!(series[1].close, 57.25);
}

#[tokio::test]
async fn history_without_bars_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/UDOW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": [{ "meta": { "regularMarketPrice": 80.0 }, "indicators": { "quote": [{}] } }],
                "error": null
            }
        })))
        .mount(&server)
        .await;

    let series = provider(&server)
        .get_price_history("UDOW", since(), HistoryInterval::Daily)
        .await
        .unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn mismatched_arrays_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SOXL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": [{
                    "meta": { "regularMarketPrice": 30.0 },
                    "timestamp": [JAN_2_OPEN, JAN_2_OPEN + DAY],
                    "indicators": { "quote": [{ "close": [29.0] }] }
                }],
                "error": null
            }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .get_price_history("SOXL", since(), HistoryInterval::Daily)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MalformedSeries { .. }));
}

#[tokio::test]
async fn unexpected_payload_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SOXL"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>consent</html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .get_price_history("SOXL", since(), HistoryInterval::Daily)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MalformedSeries { .. }));
}

#[tokio::test]
async fn chart_error_is_data_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server).get_quote("NOPE").await.unwrap_err();
    assert!(matches!(err, EngineError::DataUnavailable { .. }));
    assert!(err.to_string().contains("Not Found"));
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPXL"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = provider(&server).get_quote("SPXL").await.unwrap_err();
    assert!(err.is_data_error());
    server.verify().await;
}

/// 250 flat daily closes ending yesterday, then a bar still forming at `live`
fn chart_with_live_bar(live: f64) -> serde_json::Value {
    let last_trade = Utc::now().timestamp() - 60;
    let mut timestamps: Vec<i64> = (1..=250).rev().map(|days| last_trade - days * DAY).collect();
    let mut closes: Vec<f64> = vec![100.0; 250];
    timestamps.push(last_trade);
    closes.push(live);

    json!({
        "chart": {
            "result": [{
                "meta": {
                    "regularMarketPrice": live,
                    "regularMarketTime": last_trade,
                    "gmtoffset": -18000
                },
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

#[tokio::test]
async fn history_excludes_current_session_bar() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPXL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_with_live_bar(130.0)))
        .mount(&server)
        .await;

    let series = provider(&server)
        .get_price_history("SPXL", since(), HistoryInterval::Daily)
        .await
        .unwrap();

    assert_eq!(series.len(), 250);
    assert!(series.iter().all(|p| p.close == 100.0));
}

#[tokio::test]
async fn live_quote_breaks_out_of_past_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPXL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_with_live_bar(130.0)))
        .mount(&server)
        .await;

    let config = RuntimeConfig {
        evaluation_interval_seconds: 60,
        tickers: vec!["SPXL".to_string()],
        history_days: 400,
    };
    let runtime = SignalRuntime::new(
        config,
        Arc::new(provider(&server)),
        Arc::new(ThresholdClassifier),
    );

    let report = runtime.evaluate_ticker("SPXL").await.unwrap();
    let range = report.evaluation.indicators.range().unwrap();
    assert_eq!(range.high, 100.0);
    assert_eq!(report.evaluation.price, 130.0);
    assert_eq!(report.evaluation.classification.signal, Signal::BreakoutBuy);
}
