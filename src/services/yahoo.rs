//! Yahoo Finance market data provider (v8 chart endpoint)

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DEFAULT_YAHOO_BASE_URL;
use crate::error::EngineError;
use crate::models::PricePoint;
use crate::services::market_data::{HistoryInterval, MarketDataProvider};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; etfsignal/0.1)";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    /// Epoch seconds of the last trade behind `regular_market_price`
    regular_market_time: Option<i64>,
    /// Exchange offset from UTC in seconds
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooFinanceProvider {
    base_url: String,
    client: reqwest::Client,
    max_retries: usize,
    min_retry_delay: Duration,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_base_url(DEFAULT_YAHOO_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            max_retries: 3,
            min_retry_delay: Duration::from_millis(500),
        }
    }

    /// Override retry policy for transport and server failures
    pub fn with_retries(mut self, max_retries: usize, min_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.min_retry_delay = min_delay;
        self
    }

    async fn fetch_chart(
        &self,
        ticker: &str,
        query: &[(&str, String)],
    ) -> Result<ChartResult, EngineError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let url = url.as_str();

        let fetch = || async move {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| EngineError::data_unavailable(ticker, e))?;

            let status = response.status();
            if status.is_server_error() {
                return Err(EngineError::data_unavailable(
                    ticker,
                    format!("provider returned {}", status),
                ));
            }

            let body = response.text().await.map_err(|e| {
                EngineError::data_unavailable(ticker, format!("failed to read body: {}", e))
            })?;
            Ok::<_, EngineError>((status, body))
        };

        let (status, body) = fetch
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(self.min_retry_delay)
                    .with_max_times(self.max_retries),
            )
            .when(|e| matches!(e, EngineError::DataUnavailable { .. }))
            .notify(|e, delay| {
                warn!(
                    ticker = %ticker,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "YahooFinanceProvider: retrying chart request for {}",
                    ticker
                );
            })
            .await?;

        let envelope: ChartEnvelope = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                EngineError::malformed(ticker, format!("unexpected chart payload: {}", e))
            } else {
                EngineError::data_unavailable(ticker, format!("provider returned {}", status))
            }
        })?;

        if let Some(error) = envelope.chart.error {
            return Err(EngineError::data_unavailable(
                ticker,
                format!(
                    "{}: {}",
                    error.code,
                    error.description.unwrap_or_default()
                ),
            ));
        }

        envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| EngineError::malformed(ticker, "chart response has no result"))
    }
}

/// Pair timestamps with closes, dropping bars without a close.
///
/// Dates are taken in exchange local time. Bars from the session of the
/// current quote onwards are dropped: while the market is open the last bar
/// is still forming and its close is the live quote itself.
fn series_from_chart(ticker: &str, chart: ChartResult) -> Result<Vec<PricePoint>, EngineError> {
    let closes = match chart.indicators.quote.into_iter().next() {
        Some(block) => block.close,
        None if chart.timestamp.is_empty() => return Ok(Vec::new()),
        None => return Err(EngineError::malformed(ticker, "chart has no quote block")),
    };

    if closes.len() != chart.timestamp.len() {
        return Err(EngineError::malformed(
            ticker,
            format!(
                "{} timestamps but {} closes",
                chart.timestamp.len(),
                closes.len()
            ),
        ));
    }

    let offset = chart.meta.gmtoffset.unwrap_or(0);
    let session = chart
        .meta
        .regular_market_time
        .and_then(|t| DateTime::<Utc>::from_timestamp(t + offset, 0))
        .map(|dt| dt.date_naive());
    let mut series: Vec<PricePoint> = Vec::with_capacity(closes.len());

    for (timestamp, close) in chart.timestamp.into_iter().zip(closes) {
        let Some(close) = close.filter(|c| c.is_finite()) else {
            continue;
        };
        let date = DateTime::<Utc>::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| EngineError::malformed(ticker, format!("bad timestamp {}", timestamp)))?
            .date_naive();

        if session.is_some_and(|session| date >= session) {
            continue;
        }
        if let Some(last) = series.last() {
            if date < last.date {
                return Err(EngineError::malformed(ticker, "history is not chronological"));
            }
        }
        series.push(PricePoint::new(date, close));
    }

    Ok(series)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn get_quote(&self, ticker: &str) -> Result<f64, EngineError> {
        let query = [
            ("range", "1d".to_string()),
            ("interval", HistoryInterval::Daily.as_str().to_string()),
        ];
        let chart = self.fetch_chart(ticker, &query).await?;

        let price = chart
            .meta
            .regular_market_price
            .filter(|p| p.is_finite())
            .ok_or_else(|| EngineError::data_unavailable(ticker, "no regular market price"))?;

        debug!(ticker = %ticker, price = price, "YahooFinanceProvider: quote for {}", ticker);
        Ok(price)
    }

    async fn get_price_history(
        &self,
        ticker: &str,
        since: NaiveDate,
        interval: HistoryInterval,
    ) -> Result<Vec<PricePoint>, EngineError> {
        let period1 = since.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or(0);
        let period2 = Utc::now().timestamp();
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", interval.as_str().to_string()),
        ];

        let chart = self.fetch_chart(ticker, &query).await?;
        let series = series_from_chart(ticker, chart)?;

        debug!(
            ticker = %ticker,
            count = series.len(),
            since = %since,
            "YahooFinanceProvider: fetched {} closes for {}",
            series.len(),
            ticker
        );
        Ok(series)
    }
}
