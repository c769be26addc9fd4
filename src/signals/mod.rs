//! Signal classification, transition tracking and the evaluation engine.

pub mod classifier;
pub mod engine;
pub mod tracker;

pub use classifier::*;
pub use engine::*;
pub use tracker::*;
