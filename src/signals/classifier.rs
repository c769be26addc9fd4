//! Classifier strategies mapping indicators and a quote to a signal.
//!
//! Both strategies share the indicator math and emit the same canonical
//! [`Signal`]; they differ only in the label they attach.
//!
//! All comparisons use values rounded to two decimals. A raw-precision
//! crossing can therefore be masked when both sides round to the same cent;
//! such ties resolve to "no crossing".

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::EngineError;
use crate::indicators::math::round2;
use crate::models::{Classification, IndicatorSet, Signal, Tone};

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// A named classification strategy selected by the embedding application
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn classify(&self, price: f64, indicators: &IndicatorSet) -> Classification;
}

/// Canonical five-way classifier.
///
/// 1. Baseline from the moving averages: price above both SMAs is `Buy`,
///    below both is `Sell`, anything else (or a missing SMA) is `Hold`.
/// 2. Breakout override: price above the range high is `BreakoutBuy`, below
///    the range low is `BreakoutSell`, replacing the baseline.
///
/// RSI and MACD are diagnostic only and never gate the signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdClassifier;

impl ThresholdClassifier {
    pub fn signal(price: f64, indicators: &IndicatorSet) -> Signal {
        let price = round2(price);
        breakout(price, indicators).unwrap_or_else(|| baseline(price, indicators))
    }
}

impl Classifier for ThresholdClassifier {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn classify(&self, price: f64, indicators: &IndicatorSet) -> Classification {
        Classification::from_signal(Self::signal(price, indicators))
    }
}

fn baseline(price: f64, indicators: &IndicatorSet) -> Signal {
    match (indicators.sma_short, indicators.sma_long) {
        (Some(short), Some(long)) if price > short && price > long => Signal::Buy,
        (Some(short), Some(long)) if price < short && price < long => Signal::Sell,
        _ => Signal::Hold,
    }
}

fn breakout(price: f64, indicators: &IndicatorSet) -> Option<Signal> {
    let range = indicators.range()?;
    if price > range.high {
        Some(Signal::BreakoutBuy)
    } else if price < range.low {
        Some(Signal::BreakoutSell)
    } else {
        None
    }
}

/// Dashboard classifier producing a multi-factor label such as
/// `Long (SMA) Overbought (RSI) Bullish (MACD)`.
///
/// The signal itself is the canonical one. The label is `N/A` until SMA,
/// RSI and MACD are all defined, or when no factor has an opinion. The tone
/// follows the last factor that contributed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptiveClassifier;

impl DescriptiveClassifier {
    fn hints(price: f64, indicators: &IndicatorSet) -> Vec<(&'static str, Tone)> {
        let (Some(sma_short), Some(sma_long), Some(rsi), Some(macd)) = (
            indicators.sma_short,
            indicators.sma_long,
            indicators.rsi,
            indicators.macd(),
        ) else {
            return Vec::new();
        };

        let mut hints = Vec::new();

        if sma_short > sma_long {
            hints.push(("Long (SMA)", Tone::Bullish));
        } else if sma_short < sma_long {
            hints.push(("Short (SMA)", Tone::Bearish));
        }

        if rsi > RSI_OVERBOUGHT {
            hints.push(("Overbought (RSI)", Tone::Bearish));
        } else if rsi < RSI_OVERSOLD {
            hints.push(("Oversold (RSI)", Tone::Bullish));
        }

        if macd.histogram > 0.0 {
            hints.push(("Bullish (MACD)", Tone::Bullish));
        } else if macd.histogram < 0.0 {
            hints.push(("Bearish (MACD)", Tone::Bearish));
        }

        match breakout(price, indicators) {
            Some(Signal::BreakoutBuy) => hints.push(("Breakout Up (Breakout)", Tone::Bullish)),
            Some(Signal::BreakoutSell) => {
                hints.push(("Breakout Down (Breakout)", Tone::Bearish))
            }
            _ => {}
        }

        hints
    }
}

impl Classifier for DescriptiveClassifier {
    fn name(&self) -> &'static str {
        "descriptive"
    }

    fn classify(&self, price: f64, indicators: &IndicatorSet) -> Classification {
        let price = round2(price);
        let signal = ThresholdClassifier::signal(price, indicators);
        let hints = Self::hints(price, indicators);

        let Some(&(_, tone)) = hints.last() else {
            return Classification {
                signal,
                label: "N/A".to_string(),
                tone: Tone::Neutral,
            };
        };

        let label = hints
            .iter()
            .map(|(hint, _)| *hint)
            .collect::<Vec<_>>()
            .join(" ");

        Classification {
            signal,
            label,
            tone,
        }
    }
}

/// Strategy selector, parsed from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Threshold,
    Descriptive,
}

impl ClassifierKind {
    pub fn build(self) -> Arc<dyn Classifier> {
        match self {
            ClassifierKind::Threshold => Arc::new(ThresholdClassifier),
            ClassifierKind::Descriptive => Arc::new(DescriptiveClassifier),
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "threshold" | "canonical" => Ok(ClassifierKind::Threshold),
            "descriptive" | "label" => Ok(ClassifierKind::Descriptive),
            other => Err(EngineError::Config(format!("unknown classifier '{}'", other))),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierKind::Threshold => f.write_str("threshold"),
            ClassifierKind::Descriptive => f.write_str("descriptive"),
        }
    }
}
