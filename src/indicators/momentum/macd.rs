//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::math::round2;
use crate::indicators::trend::{calculate_ema, ema_series};
use crate::indicators::{MACD_FAST_PERIOD, MACD_SIGNAL_PERIOD, MACD_SLOW_PERIOD};
use crate::models::indicators::MacdIndicator;

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow), both seeded at the first close of the slice
/// Signal = EMA(signal) of the last `signal_period` points of the fast EMA series
/// Histogram = MACD - Signal
///
/// Returns `None` when fewer than `slow_period` closes are available.
pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Option<MacdIndicator> {
    if slow_period == 0 || closes.len() < slow_period {
        return None;
    }

    let fast_ema = calculate_ema(closes, fast_period)?;
    let slow_ema = calculate_ema(closes, slow_period)?;
    let macd_line = round2(fast_ema - slow_ema);

    let fast_series = ema_series(closes, fast_period);
    let tail_start = fast_series.len().saturating_sub(signal_period);
    let signal_line = calculate_ema(&fast_series[tail_start..], signal_period)?;

    Some(MacdIndicator {
        macd: macd_line,
        signal: signal_line,
        histogram: round2(macd_line - signal_line),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(closes: &[f64]) -> Option<MacdIndicator> {
    calculate_macd(closes, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD)
}
