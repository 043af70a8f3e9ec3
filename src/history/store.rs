//! History store keyed by market id

use super::{HistoryWindow, Sample};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Owns one [`HistoryWindow`] per market id
///
/// Windows are created on the first eligible sighting of a market and are
/// kept for the lifetime of the process, even after the market stops being
/// listed.
#[derive(Debug)]
pub struct HistoryStore {
    windows: HashMap<String, HistoryWindow>,
    span: Duration,
}

impl HistoryStore {
    /// Create a store retaining `window_secs` of history per market
    pub fn new(window_secs: u64) -> Self {
        Self {
            windows: HashMap::new(),
            span: i64::try_from(window_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Record an observation and prune the market's window
    ///
    /// Returns `None` when the sample is older than the newest one already
    /// held; the window is left as it was.
    pub fn record(
        &mut self,
        market_id: &str,
        timestamp: DateTime<Utc>,
        price: Decimal,
        volume: Decimal,
    ) -> Option<&HistoryWindow> {
        let span = self.span;
        let window = self.windows.entry(market_id.to_string()).or_default();

        if !window.push(Sample::new(timestamp, price, volume), span) {
            tracing::warn!(
                market_id,
                timestamp = %timestamp,
                "Dropping sample older than newest recorded sample"
            );
            return None;
        }

        Some(window)
    }

    /// Oldest sample still inside the market's window
    pub fn reference_sample(&self, market_id: &str) -> Option<Sample> {
        self.windows.get(market_id).and_then(|w| w.front().copied())
    }

    /// Window for a market, if it has ever been recorded
    pub fn window(&self, market_id: &str) -> Option<&HistoryWindow> {
        self.windows.get(market_id)
    }

    /// Number of samples held for a market
    pub fn sample_count(&self, market_id: &str) -> usize {
        self.windows.get(market_id).map_or(0, HistoryWindow::len)
    }

    /// Number of markets being tracked
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
