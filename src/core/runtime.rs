//! Evaluation loop body: fetch, evaluate, track, persist, notify.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::{Config, DEFAULT_TICKERS};
use crate::db::SnapshotStore;
use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::models::indicators::closes;
use crate::models::{SignalChange, SnapshotRecord, TickerSnapshot};
use crate::services::market_data::{HistoryInterval, MarketDataProvider};
use crate::services::notifier::Notifier;
use crate::signals::{Classifier, Evaluation, SignalEngine, SignalTracker, Transition, MIN_HISTORY};

/// Configuration for the evaluation runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub evaluation_interval_seconds: u64,
    pub tickers: Vec<String>,
    pub history_days: i64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_seconds: 60,
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            history_days: 400,
        }
    }
}

impl From<&Config> for RuntimeConfig {
    fn from(config: &Config) -> Self {
        Self {
            evaluation_interval_seconds: config.eval_interval_seconds,
            tickers: config.tickers.clone(),
            history_days: config.history_days,
        }
    }
}

/// Mutable engine state owned by the runtime.
///
/// Holds the per-ticker previous signal and the latest snapshot served to
/// the presentation layer. A ticker whose evaluation fails keeps its
/// previous entries.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub tracker: SignalTracker,
    pub snapshots: BTreeMap<String, TickerSnapshot>,
    pub last_update: Option<DateTime<Utc>>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub type SharedEngineState = Arc<RwLock<EngineState>>;

/// Result of one successful ticker evaluation
#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub evaluation: Evaluation,
    pub transition: Transition,
}

/// Summary of one pass over every ticker
#[derive(Debug, Default)]
pub struct CycleReport {
    pub evaluated: Vec<TickerReport>,
    pub failed: Vec<(String, EngineError)>,
}

impl CycleReport {
    pub fn transitions(&self) -> usize {
        self.evaluated
            .iter()
            .filter(|r| r.transition.is_changed())
            .count()
    }
}

pub struct SignalRuntime {
    config: RuntimeConfig,
    provider: Arc<dyn MarketDataProvider>,
    classifier: Arc<dyn Classifier>,
    store: Option<Arc<dyn SnapshotStore>>,
    notifiers: Vec<Arc<dyn Notifier>>,
    metrics: Option<Arc<Metrics>>,
    state: SharedEngineState,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        provider: Arc<dyn MarketDataProvider>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            config,
            provider,
            classifier,
            store: None,
            notifiers: Vec::new(),
            metrics: None,
            state: Arc::new(RwLock::new(EngineState::new())),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Use an externally created state, e.g. one already shared with the HTTP server
    pub fn with_state(mut self, state: SharedEngineState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> SharedEngineState {
        self.state.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Evaluate every configured ticker once, sequentially.
    ///
    /// A failing ticker is logged and skipped; it never stops the others.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for ticker in &self.config.tickers {
            match self.evaluate_ticker(ticker).await {
                Ok(ticker_report) => report.evaluated.push(ticker_report),
                Err(e) => {
                    error!(
                        ticker = %ticker,
                        error = %e,
                        "SignalRuntime: skipping {} this cycle",
                        ticker
                    );
                    if let Some(ref metrics) = self.metrics {
                        metrics.signal_evaluation_failures_total.inc();
                    }
                    report.failed.push((ticker.clone(), e));
                }
            }
        }

        self.state.write().await.last_update = Some(Utc::now());

        info!(
            evaluated = report.evaluated.len(),
            failed = report.failed.len(),
            transitions = report.transitions(),
            "SignalRuntime: cycle complete"
        );
        report
    }

    /// Fetch data for one ticker and run it through the engine.
    ///
    /// Only market data failures are returned as errors. Storage and
    /// notification failures are logged and the evaluation still counts.
    pub async fn evaluate_ticker(&self, ticker: &str) -> Result<TickerReport, EngineError> {
        let start = Instant::now();

        let quote = self.provider.get_quote(ticker).await?;
        let since = (Utc::now() - Duration::days(self.config.history_days)).date_naive();
        let history = self
            .provider
            .get_price_history(ticker, since, HistoryInterval::Daily)
            .await?;
        let closes = closes(&history);

        if closes.len() < MIN_HISTORY {
            debug!(
                ticker = %ticker,
                count = closes.len(),
                min = MIN_HISTORY,
                "SignalRuntime: short history for {} ({} < {}), SMA(200) undefined",
                ticker,
                closes.len(),
                MIN_HISTORY
            );
        }

        let evaluation = SignalEngine::evaluate(&closes, quote, self.classifier.as_ref());
        let now = Utc::now();
        let signal = evaluation.classification.signal;

        if let Some(ref store) = self.store {
            let record = SnapshotRecord::new(ticker, evaluation.price, &evaluation.indicators, now);
            if let Err(e) = store.append(&record).await {
                warn!(
                    ticker = %ticker,
                    error = %e,
                    "SignalRuntime: failed to persist snapshot for {}",
                    ticker
                );
            }
        }

        let transition = {
            let mut state = self.state.write().await;
            let transition = state.tracker.observe(ticker, signal);
            state.snapshots.insert(
                ticker.to_string(),
                TickerSnapshot {
                    price: evaluation.price,
                    signal,
                    label: evaluation.classification.label.clone(),
                    tone: evaluation.classification.tone,
                    indicators: evaluation.indicators,
                    evaluated_at: now,
                },
            );
            transition
        };

        if let Transition::Changed { previous, current } = transition {
            info!(
                ticker = %ticker,
                previous = ?previous,
                signal = %current,
                price = evaluation.price,
                "SignalRuntime: signal transition for {}",
                ticker
            );
            if let Some(ref metrics) = self.metrics {
                metrics
                    .signal_transitions_total
                    .with_label_values(&[ticker, current.as_str()])
                    .inc();
            }

            let change = SignalChange::new(
                ticker,
                evaluation.price,
                &evaluation.indicators,
                current,
                previous,
                now,
            );
            for notifier in &self.notifiers {
                if let Err(e) = notifier.notify(&change).await {
                    warn!(
                        ticker = %ticker,
                        error = %e,
                        "SignalRuntime: failed to notify transition for {}",
                        ticker
                    );
                }
            }
        } else {
            debug!(ticker = %ticker, signal = %signal, "SignalRuntime: {} unchanged", ticker);
        }

        if let Some(ref metrics) = self.metrics {
            metrics.signal_evaluations_total.inc();
            metrics
                .signal_evaluation_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        Ok(TickerReport {
            ticker: ticker.to_string(),
            evaluation,
            transition,
        })
    }
}
