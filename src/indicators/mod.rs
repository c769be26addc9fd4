//! Technical indicators over daily closing prices.
//!
//! Every function is pure and takes the closes in chronological order.
//! Results are rounded to two decimals, matching what is displayed.

pub mod math;
pub mod momentum;
pub mod structure;
pub mod trend;

pub use momentum::*;
pub use structure::*;
pub use trend::*;

pub const SMA_SHORT_PERIOD: usize = 50;
pub const SMA_LONG_PERIOD: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;
pub const BREAKOUT_WINDOW: usize = 60;
