//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{IndicatorSet, MacdIndicator, PricePoint, PriceRange};
pub use signal::{
    Classification, Signal, SignalChange, SnapshotRecord, TickerSnapshot, Tone,
};
