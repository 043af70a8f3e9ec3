//! Change classification against the window baseline

use super::{AlertCategory, AlertEvent, MarketRef, Triggers};
use crate::config::DetectionConfig;
use crate::history::Sample;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Price at which a market becomes the favorite
pub const FLIP_LEVEL: Decimal = dec!(0.50);

/// Price at which a market is treated as about to resolve
pub const RESOLVE_LEVEL: Decimal = dec!(0.99);

/// Label precedence, highest first
const PRECEDENCE: [(AlertCategory, fn(&Triggers) -> bool); 4] = [
    (AlertCategory::Whale, |t: &Triggers| t.whale),
    (AlertCategory::Flip, |t: &Triggers| t.flip),
    (AlertCategory::Resolve, |t: &Triggers| t.resolve),
    (AlertCategory::Spike, |t: &Triggers| t.spike),
];

/// Classifies the move between a reference and a current sample
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    price_change_threshold: Decimal,
    whale_volume_threshold: Decimal,
}

impl SignalEvaluator {
    /// Create an evaluator with the given thresholds
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            price_change_threshold: config.price_change_threshold,
            whale_volume_threshold: config.whale_volume_threshold,
        }
    }

    /// Evaluate every trigger condition independently
    pub fn triggers(&self, reference: &Sample, current: &Sample) -> Triggers {
        let price_delta = current.price - reference.price;
        let volume_delta = current.volume - reference.volume;

        Triggers {
            spike: price_delta.abs() >= self.price_change_threshold,
            flip: reference.price < FLIP_LEVEL && current.price >= FLIP_LEVEL,
            resolve: reference.price < RESOLVE_LEVEL && current.price >= RESOLVE_LEVEL,
            whale: volume_delta > self.whale_volume_threshold,
        }
    }

    /// Produce an alert if any condition holds
    pub fn evaluate(
        &self,
        market: &MarketRef,
        reference: Sample,
        current: Sample,
    ) -> Option<AlertEvent> {
        let triggers = self.triggers(&reference, &current);
        let category = label(&triggers)?;

        Some(AlertEvent {
            id: Uuid::new_v4(),
            market: market.clone(),
            category,
            triggers,
            reference,
            current,
            volume_delta: current.volume - reference.volume,
        })
    }
}

/// Pick the highest-precedence label among the conditions that hold
pub fn label(triggers: &Triggers) -> Option<AlertCategory> {
    PRECEDENCE
        .iter()
        .find(|(_, holds)| holds(triggers))
        .map(|(category, _)| *category)
}
