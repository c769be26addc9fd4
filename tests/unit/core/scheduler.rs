//! Unit tests for the evaluation scheduler

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use cron::Schedule;
use etfsignal::core::runtime::{RuntimeConfig, SignalRuntime};
use etfsignal::core::scheduler::{interval_to_cron, JobScheduler};
use etfsignal::models::PricePoint;
use etfsignal::services::market_data::{HistoryInterval, MarketDataProvider};
use etfsignal::signals::ThresholdClassifier;
use etfsignal::EngineError;

#[test]
fn test_interval_to_cron() {
    assert_eq!(interval_to_cron(30).unwrap(), "*/30 * * * * *");
    assert_eq!(interval_to_cron(60).unwrap(), "0 */1 * * * *");
    assert_eq!(interval_to_cron(300).unwrap(), "0 */5 * * * *");
    assert_eq!(interval_to_cron(7200).unwrap(), "0 0 */2 * * *");
    assert_eq!(interval_to_cron(86_400).unwrap(), "0 0 0 * * *");
}

#[test]
fn test_uneven_intervals_are_rejected() {
    for interval in [45, 90, 420, 5400, 18_000, 172_800] {
        assert!(interval_to_cron(interval).is_err(), "{} was accepted", interval);
    }
}

#[test]
fn test_zero_interval_disables_scheduler() {
    assert!(interval_to_cron(0).is_err());
}

#[test]
fn test_generated_expressions_parse() {
    for interval in [1, 15, 60, 120, 600, 3600, 21_600, 86_400] {
        let expr = interval_to_cron(interval).unwrap();
        assert!(Schedule::from_str(&expr).is_ok(), "{} did not parse", expr);
    }
}

struct UnavailableProvider;

#[async_trait]
impl MarketDataProvider for UnavailableProvider {
    async fn get_quote(&self, ticker: &str) -> Result<f64, EngineError> {
        Err(EngineError::data_unavailable(ticker, "offline"))
    }

    async fn get_price_history(
        &self,
        ticker: &str,
        _since: NaiveDate,
        _interval: HistoryInterval,
    ) -> Result<Vec<PricePoint>, EngineError> {
        Err(EngineError::data_unavailable(ticker, "offline"))
    }
}

fn runtime() -> Arc<SignalRuntime> {
    let config = RuntimeConfig {
        evaluation_interval_seconds: 60,
        tickers: vec!["SPXL".to_string()],
        history_days: 400,
    };
    Arc::new(SignalRuntime::new(
        config,
        Arc::new(UnavailableProvider),
        Arc::new(ThresholdClassifier),
    ))
}

#[test]
fn test_scheduler_rejects_zero_interval() {
    assert!(JobScheduler::new(runtime(), 0).is_err());
}

#[tokio::test]
async fn test_start_runs_initial_cycle_and_stop_aborts() {
    let runtime = runtime();
    let state = runtime.state();
    let scheduler = JobScheduler::new(runtime, 60).unwrap();
    assert!(!scheduler.is_running().await);

    scheduler.start().await;
    assert!(scheduler.is_running().await);

    let mut cycled = false;
    for _ in 0..50 {
        if state.read().await.last_update.is_some() {
            cycled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(cycled, "initial cycle did not run");

    scheduler.stop().await;
    assert!(!scheduler.is_running().await);
}

#[tokio::test]
async fn test_without_run_on_start_waits_for_tick() {
    let runtime = runtime();
    let state = runtime.state();
    let scheduler = JobScheduler::new(runtime, 3600)
        .unwrap()
        .with_run_on_start(false);

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(state.read().await.last_update.is_none());

    scheduler.stop().await;
}
