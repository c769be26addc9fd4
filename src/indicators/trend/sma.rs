//! SMA (Simple Moving Average) indicator

use crate::indicators::math::round2;

/// Arithmetic mean of the last `period` closes.
///
/// Returns `None` when fewer than `period` closes are available.
pub fn calculate_sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let sum: f64 = window.iter().sum();
    Some(round2(sum / period as f64))
}
