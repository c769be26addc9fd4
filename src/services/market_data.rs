//! Market data provider interface.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::PricePoint;

/// Bar size of a requested price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryInterval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl HistoryInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryInterval::Daily => "1d",
            HistoryInterval::Weekly => "1wk",
            HistoryInterval::Monthly => "1mo",
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest live price for a ticker.
    ///
    /// Fails with [`EngineError::DataUnavailable`] when the provider errors.
    async fn get_quote(&self, ticker: &str) -> Result<f64, EngineError>;

    /// Chronological closes for a ticker since `since`.
    ///
    /// An empty history is not an error; callers treat it as insufficient
    /// history. Payloads in an unexpected shape fail with
    /// [`EngineError::MalformedSeries`].
    async fn get_price_history(
        &self,
        ticker: &str,
        since: NaiveDate,
        interval: HistoryInterval,
    ) -> Result<Vec<PricePoint>, EngineError>;
}
