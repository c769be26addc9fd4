//! EMA (Exponential Moving Average) indicator
//!
//! The average is seeded with the first close of the slice it is given and
//! then smoothed over every following close. The result therefore depends on
//! exactly which sub-slice the caller hands in: pass the last 26 closes to get
//! a 26-period EMA seeded 26 sessions ago.

use crate::indicators::math::round2;

/// Smoothing factor `k = 2 / (period + 1)`
pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Running EMA after each close, unrounded.
///
/// `ema[0] = closes[0]`, `ema[i] = closes[i] * k + ema[i - 1] * (1 - k)`.
pub fn ema_series(closes: &[f64], period: usize) -> Vec<f64> {
    let k = smoothing_factor(period);
    let mut values = Vec::with_capacity(closes.len());
    let mut iter = closes.iter();

    if let Some(&seed) = iter.next() {
        let mut ema = seed;
        values.push(ema);
        for &close in iter {
            ema = close * k + ema * (1.0 - k);
            values.push(ema);
        }
    }

    values
}

/// Final EMA value over the whole slice, rounded to two decimals.
///
/// Returns `None` for an empty slice or a zero period.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    ema_series(closes, period).last().copied().map(round2)
}
