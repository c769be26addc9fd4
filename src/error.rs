use thiserror::Error;

/// Errors raised around the engine boundary.
///
/// Insufficient history is not represented here: indicators that need more
/// data than available are simply absent from the
/// [`IndicatorSet`](crate::models::IndicatorSet).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("market data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("malformed price series for {ticker}: {reason}")]
    MalformedSeries { ticker: String, reason: String },

    #[error("snapshot storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn data_unavailable(ticker: &str, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(ticker: &str, reason: impl ToString) -> Self {
        Self::MalformedSeries {
            ticker: ticker.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure came from the market data collaborator.
    ///
    /// Both variants skip the ticker for the current cycle.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable { .. } | Self::MalformedSeries { .. }
        )
    }
}
