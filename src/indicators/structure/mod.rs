//! Market structure indicators: breakout range

pub mod range;

pub use range::*;
