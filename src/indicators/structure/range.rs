//! Rolling high/low range used for breakout detection

use crate::indicators::math::round2;
use crate::indicators::BREAKOUT_WINDOW;
use crate::models::indicators::PriceRange;

/// Highest and lowest close over the last `window` closes.
///
/// Shorter series use every close available. Returns `None` only for an
/// empty series.
pub fn calculate_range(closes: &[f64], window: usize) -> Option<PriceRange> {
    if closes.is_empty() || window == 0 {
        return None;
    }

    let recent = &closes[closes.len().saturating_sub(window)..];
    let high = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().copied().fold(f64::INFINITY, f64::min);

    Some(PriceRange {
        high: round2(high),
        low: round2(low),
    })
}

/// Calculate the breakout range with the default window (60)
pub fn calculate_range_default(closes: &[f64]) -> Option<PriceRange> {
    calculate_range(closes, BREAKOUT_WINDOW)
}
