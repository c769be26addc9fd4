use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::indicators::{IndicatorSet, MacdIndicator};

/// Discrete trading signal derived for one ticker evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Hold,
    Buy,
    Sell,
    #[serde(rename = "Breakout Buy")]
    BreakoutBuy,
    #[serde(rename = "Breakout Sell")]
    BreakoutSell,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Hold => "Hold",
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::BreakoutBuy => "Breakout Buy",
            Signal::BreakoutSell => "Breakout Sell",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Signal::Buy | Signal::BreakoutBuy => Tone::Bullish,
            Signal::Sell | Signal::BreakoutSell => Tone::Bearish,
            Signal::Hold => Tone::Neutral,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction a classification leans towards (drives dashboard colouring)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Bullish,
    Bearish,
    Neutral,
}

/// Output of a classifier strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Canonical five-way signal, used for persistence and notification
    pub signal: Signal,
    /// Display label; equal to the signal name for the threshold strategy
    pub label: String,
    pub tone: Tone,
}

impl Classification {
    pub fn from_signal(signal: Signal) -> Self {
        Self {
            signal,
            label: signal.to_string(),
            tone: signal.tone(),
        }
    }
}

/// Latest evaluation result kept per ticker for the presentation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub price: f64,
    pub signal: Signal,
    pub label: String,
    pub tone: Tone,
    pub indicators: IndicatorSet,
    pub evaluated_at: DateTime<Utc>,
}

/// Per-evaluation record appended to a ticker's journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
}

impl SnapshotRecord {
    pub fn new(ticker: &str, price: f64, indicators: &IndicatorSet, at: DateTime<Utc>) -> Self {
        Self {
            ticker: ticker.to_string(),
            date: at.date_naive(),
            time: at.time(),
            price,
            sma_short: indicators.sma_short,
            sma_long: indicators.sma_long,
            rsi: indicators.rsi,
        }
    }
}

/// Payload handed to notifiers when a ticker's signal changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalChange {
    pub ticker: String,
    pub price: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_diagnostic: Option<MacdIndicator>,
    pub signal: Signal,
    /// `None` on the first evaluation of a ticker
    pub previous: Option<Signal>,
    pub timestamp: DateTime<Utc>,
}

impl SignalChange {
    pub fn new(
        ticker: &str,
        price: f64,
        indicators: &IndicatorSet,
        signal: Signal,
        previous: Option<Signal>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            price,
            sma_short: indicators.sma_short,
            sma_long: indicators.sma_long,
            rsi: indicators.rsi,
            macd_diagnostic: indicators.macd(),
            signal,
            previous,
            timestamp,
        }
    }

    /// One-line human readable summary, used as notification subject
    pub fn summary(&self) -> String {
        match self.previous {
            Some(previous) => format!(
                "{}: {} -> {} at {:.2}",
                self.ticker, previous, self.signal, self.price
            ),
            None => format!("{}: {} at {:.2}", self.ticker, self.signal, self.price),
        }
    }
}
