use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close from the price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Extract closing prices from a chronological price history
pub fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// High/low of the trailing breakout window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub high: f64,
    pub low: f64,
}

/// Indicators computed for one evaluation.
///
/// A field is `None` when the series is shorter than the indicator needs;
/// consumers must read that as "no opinion", never as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal_line: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub range_high: Option<f64>,
    pub range_low: Option<f64>,
}

impl IndicatorSet {
    pub fn with_macd(mut self, macd: MacdIndicator) -> Self {
        self.macd_line = Some(macd.macd);
        self.macd_signal_line = Some(macd.signal);
        self.macd_histogram = Some(macd.histogram);
        self
    }

    pub fn with_range(mut self, range: PriceRange) -> Self {
        self.range_high = Some(range.high);
        self.range_low = Some(range.low);
        self
    }

    /// MACD triple, present only when all three parts were computed
    pub fn macd(&self) -> Option<MacdIndicator> {
        Some(MacdIndicator {
            macd: self.macd_line?,
            signal: self.macd_signal_line?,
            histogram: self.macd_histogram?,
        })
    }

    pub fn range(&self) -> Option<PriceRange> {
        Some(PriceRange {
            high: self.range_high?,
            low: self.range_low?,
        })
    }
}
