//! Event-detection engine
//!
//! [`SpikeEngine`] owns all per-market state (history windows and alert
//! cooldowns) and runs one synchronous pass per poll cycle. [`Scanner`]
//! drives it from the poll loop.

mod scanner;

pub use scanner::Scanner;

use crate::alert::AlertGate;
use crate::config::Config;
use crate::history::{HistoryStore, Sample};
use crate::market::{MarketFilter, MarketSnapshot};
use crate::signal::{AlertEvent, MarketRef, SignalEvaluator};
use chrono::{DateTime, Utc};

/// Outcome of one engine pass
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Alerts cleared for dispatch, already recorded in the cooldown gate
    pub alerts: Vec<AlertEvent>,
    /// Snapshots seen
    pub scanned: usize,
    /// Snapshots that passed the filter
    pub eligible: usize,
    /// Eligible snapshots without a usable price
    pub unpriced: usize,
    /// Fired events held back by the cooldown
    pub suppressed: usize,
}

/// Filter, history, evaluation and cooldown in one owned state struct
pub struct SpikeEngine {
    filter: MarketFilter,
    history: HistoryStore,
    evaluator: SignalEvaluator,
    gate: AlertGate,
}

impl SpikeEngine {
    /// Build an engine from configuration
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            MarketFilter::new(&config.filter),
            HistoryStore::new(config.history.window_secs),
            SignalEvaluator::new(&config.detection),
            AlertGate::new(config.detection.cooldown_secs),
        )
    }

    /// Assemble an engine from its components
    pub fn from_parts(
        filter: MarketFilter,
        history: HistoryStore,
        evaluator: SignalEvaluator,
        gate: AlertGate,
    ) -> Self {
        Self {
            filter,
            history,
            evaluator,
            gate,
        }
    }

    /// Process one cycle's snapshots observed at `now`
    ///
    /// Every approved alert is recorded in the gate before it is returned, so
    /// the caller must attempt delivery of each one.
    pub fn process(&mut self, snapshots: &[MarketSnapshot], now: DateTime<Utc>) -> CycleReport {
        let mut report = CycleReport {
            scanned: snapshots.len(),
            ..Default::default()
        };

        for snapshot in snapshots {
            if !self.filter.is_eligible(snapshot) {
                continue;
            }
            report.eligible += 1;

            let Some(price) = snapshot.price else {
                report.unpriced += 1;
                continue;
            };

            if self
                .history
                .record(&snapshot.id, now, price, snapshot.volume)
                .is_none()
            {
                continue;
            }

            let Some(reference) = self.history.reference_sample(&snapshot.id) else {
                continue;
            };
            let current = Sample::new(now, price, snapshot.volume);

            let Some(event) = self
                .evaluator
                .evaluate(&MarketRef::from(snapshot), reference, current)
            else {
                continue;
            };

            if !self.gate.should_alert(&snapshot.id, now) {
                report.suppressed += 1;
                tracing::debug!(
                    market_id = %snapshot.id,
                    category = %event.category,
                    "Alert suppressed by cooldown"
                );
                continue;
            }

            tracing::info!(
                alert_id = %event.id,
                market_id = %snapshot.id,
                question = %snapshot.question,
                category = %event.category,
                reference_price = %event.reference.price,
                current_price = %event.current.price,
                volume_delta = %event.volume_delta,
                elapsed = %event.elapsed_label(),
                "*** ALERT *** Triggered alert"
            );

            self.gate.record_alert(&snapshot.id, now);
            report.alerts.push(event);
        }

        report
    }

    /// Per-market history
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Cooldown state
    pub fn gate(&self) -> &AlertGate {
        &self.gate
    }
}
