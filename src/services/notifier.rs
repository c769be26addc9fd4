//! Notification delivery for signal transitions

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::EngineError;
use crate::models::SignalChange;

/// Receives a payload each time a ticker's signal changes
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, change: &SignalChange) -> Result<(), EngineError>;
}

/// Writes transitions to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, change: &SignalChange) -> Result<(), EngineError> {
        info!(
            ticker = %change.ticker,
            signal = %change.signal,
            previous = ?change.previous,
            price = change.price,
            sma_short = ?change.sma_short,
            sma_long = ?change.sma_long,
            rsi = ?change.rsi,
            macd = ?change.macd_diagnostic,
            "Signal changed: {}",
            change.summary()
        );
        Ok(())
    }
}

/// POSTs the transition payload as JSON to a webhook
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, change: &SignalChange) -> Result<(), EngineError> {
        let response = self
            .client
            .post(&self.url)
            .json(change)
            .send()
            .await
            .map_err(|e| EngineError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Notification(format!(
                "webhook returned {} for {}",
                status, change.ticker
            )));
        }

        debug!(ticker = %change.ticker, "WebhookNotifier: delivered {}", change.summary());
        Ok(())
    }
}
