//! Integration tests for webhook notifications

use chrono::Utc;
use etfsignal::models::{IndicatorSet, Signal, SignalChange};
use etfsignal::services::notifier::{LogNotifier, Notifier, WebhookNotifier};
use etfsignal::EngineError;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn change() -> SignalChange {
    let indicators = IndicatorSet {
        sma_short: Some(100.0),
        sma_long: Some(90.0),
        rsi: Some(61.5),
        ..IndicatorSet::default()
    };
    SignalChange::new(
        "SPXL",
        125.0,
        &indicators,
        Signal::BreakoutBuy,
        Some(Signal::Buy),
        Utc::now(),
    )
}

#[tokio::test]
async fn webhook_posts_change_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(serde_json::json!({
            "ticker": "SPXL",
            "signal": "Breakout Buy",
            "previous": "Buy",
            "price": 125.0
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(format!("{}/hook", server.uri())).unwrap();
    notifier.notify(&change()).await.unwrap();
    server.verify().await;
}

#[tokio::test]
async fn webhook_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(format!("{}/hook", server.uri())).unwrap();
    let err = notifier.notify(&change()).await.unwrap_err();
    assert!(matches!(err, EngineError::Notification(_)));
}

#[tokio::test]
async fn log_notifier_never_fails() {
    assert!(LogNotifier.notify(&change()).await.is_ok());
}

#[test]
fn summary_names_both_signals() {
    assert_eq!(change().summary(), "SPXL: Buy -> Breakout Buy at 125.00");
}
