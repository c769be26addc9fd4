//! ETF Signal Server
//!
//! Starts the HTTP server and the periodic signal evaluation over the
//! configured tickers.

use std::sync::Arc;
use std::time::Instant;

use dotenvy::dotenv;
use etfsignal::config::{self, Config};
use etfsignal::core::http::{start_server, AppState, HealthStatus};
use etfsignal::core::runtime::{RuntimeConfig, SignalRuntime};
use etfsignal::core::scheduler::JobScheduler;
use etfsignal::db::SnapshotJournal;
use etfsignal::logging;
use etfsignal::metrics::Metrics;
use etfsignal::services::market_data::MarketDataProvider;
use etfsignal::services::notifier::{LogNotifier, WebhookNotifier};
use etfsignal::services::yahoo::YahooFinanceProvider;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting ETF Signal Server");
    info!(environment = %config::get_environment(), "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(
        tickers = ?config.tickers,
        interval = config.eval_interval_seconds,
        classifier = %config.classifier,
        "Signal Evaluation: every {} seconds",
        config.eval_interval_seconds
    );

    let metrics = Arc::new(Metrics::new()?);
    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(YahooFinanceProvider::with_base_url(&config.yahoo_base_url)?);

    let mut runtime = SignalRuntime::new(
        RuntimeConfig::from(&config),
        provider.clone(),
        config.classifier.build(),
    )
    .with_store(Arc::new(SnapshotJournal::new(&config.journal_dir)))
    .with_notifier(Arc::new(LogNotifier))
    .with_metrics(metrics.clone());

    if let Some(ref url) = config.notify_webhook_url {
        info!(url = %url, "Webhook notifications enabled");
        runtime = runtime.with_notifier(Arc::new(WebhookNotifier::new(url)?));
    }

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        engine: runtime.state(),
        provider: Some(provider),
    };

    let runtime = Arc::new(runtime);
    let scheduler = JobScheduler::new(runtime, config.eval_interval_seconds)?;
    scheduler.start().await;

    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    scheduler.stop().await;
    info!("Server stopped");
    Ok(())
}
