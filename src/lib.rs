//! Leveraged ETF signal engine.
//!
//! Samples quotes and daily closes for a fixed set of tickers, derives SMA,
//! RSI, MACD and breakout-range indicators, classifies them into a discrete
//! [`Signal`](models::Signal) and notifies on signal transitions.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::EngineError;
