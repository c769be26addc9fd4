//! Indicator computation and classification for a single ticker.

use crate::indicators::{
    calculate_macd_default, calculate_range_default, calculate_rsi_default, calculate_sma,
    math::round2, SMA_LONG_PERIOD, SMA_SHORT_PERIOD,
};
use crate::models::{Classification, IndicatorSet};
use crate::signals::classifier::Classifier;

/// Closes needed before every indicator is defined
pub const MIN_HISTORY: usize = SMA_LONG_PERIOD;

/// Indicators and classification produced for one (series, quote) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Quote rounded to two decimals, as compared against the indicators
    pub price: f64,
    pub indicators: IndicatorSet,
    pub classification: Classification,
}

pub struct SignalEngine;

impl SignalEngine {
    /// Compute the full indicator set from chronological closes.
    ///
    /// Indicators needing more closes than available are left unset.
    pub fn indicators(closes: &[f64]) -> IndicatorSet {
        let mut set = IndicatorSet {
            sma_short: calculate_sma(closes, SMA_SHORT_PERIOD),
            sma_long: calculate_sma(closes, SMA_LONG_PERIOD),
            rsi: calculate_rsi_default(closes),
            ..IndicatorSet::default()
        };

        if let Some(macd) = calculate_macd_default(closes) {
            set = set.with_macd(macd);
        }
        if let Some(range) = calculate_range_default(closes) {
            set = set.with_range(range);
        }

        set
    }

    /// Evaluate one ticker: indicators from `closes`, then classify `quote`.
    ///
    /// Pure: the same inputs always yield the same evaluation.
    pub fn evaluate(closes: &[f64], quote: f64, classifier: &dyn Classifier) -> Evaluation {
        let price = round2(quote);
        let indicators = Self::indicators(closes);
        let classification = classifier.classify(price, &indicators);

        Evaluation {
            price,
            indicators,
            classification,
        }
    }
}
