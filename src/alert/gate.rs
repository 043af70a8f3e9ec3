//! Per-market alert cooldown

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Enforces at most one alert per market per cooldown period
///
/// Records are kept for the lifetime of the process.
#[derive(Debug)]
pub struct AlertGate {
    last_alerted: HashMap<String, DateTime<Utc>>,
    cooldown: Duration,
}

impl AlertGate {
    /// Create a gate with the given cooldown
    pub fn new(cooldown_secs: u64) -> Self {
        Self {
            last_alerted: HashMap::new(),
            cooldown: i64::try_from(cooldown_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Check whether the market is outside its cooldown
    pub fn should_alert(&self, market_id: &str, now: DateTime<Utc>) -> bool {
        match self.last_alerted.get(market_id) {
            Some(last) => now - *last > self.cooldown,
            None => true,
        }
    }

    /// Start a new cooldown period for the market
    pub fn record_alert(&mut self, market_id: &str, now: DateTime<Utc>) {
        self.last_alerted.insert(market_id.to_string(), now);
    }

    /// When the market last alerted
    pub fn last_alert(&self, market_id: &str) -> Option<DateTime<Utc>> {
        self.last_alerted.get(market_id).copied()
    }

    /// Number of markets that have ever alerted
    pub fn len(&self) -> usize {
        self.last_alerted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_alerted.is_empty()
    }
}
