//! Signal evaluation module
//!
//! Compares each market's current sample with the oldest one in its window
//! and classifies significant moves.

mod evaluator;
mod types;

pub use evaluator::{label, SignalEvaluator, FLIP_LEVEL, RESOLVE_LEVEL};
pub use types::{format_elapsed, AlertCategory, AlertEvent, MarketRef, Triggers};
