//! RSI (Relative Strength Index) indicator

use crate::indicators::math::round2;
use crate::indicators::RSI_PERIOD;

/// Calculate RSI over the first `period` closes of the slice.
///
/// Only the differences at indices `1..period` are summed (the slice is not
/// rolled), and both sums are averaged by `period`:
///
/// RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss
///
/// A zero average loss saturates at 100. Returns `None` when fewer than
/// `period` closes are available.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..period {
        let change = closes[i] - closes[i - 1];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(round2(100.0 - (100.0 / (1.0 + rs))))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> Option<f64> {
    calculate_rsi(closes, RSI_PERIOD)
}
