//! Per-market sliding window

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One observation of one market at one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// When the observation was recorded
    pub timestamp: DateTime<Utc>,
    /// Probability-style price (0.0 - 1.0)
    pub price: Decimal,
    /// Cumulative traded volume
    pub volume: Decimal,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp: DateTime<Utc>, price: Decimal, volume: Decimal) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }
}

/// Time-ordered samples for a single market
///
/// Samples are only ever appended at the back and pruned from the front, so
/// the front is always the oldest sample still inside the window.
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    samples: VecDeque<Sample>,
}

impl HistoryWindow {
    /// Create an empty window
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample and drop everything older than `span` before it
    ///
    /// Returns false (and leaves the window untouched) if the sample is older
    /// than the newest one already held.
    pub fn push(&mut self, sample: Sample, span: Duration) -> bool {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                return false;
            }
        }

        self.samples.push_back(sample);

        // A span reaching past the start of time keeps everything
        let Some(cutoff) = sample.timestamp.checked_sub_signed(span) else {
            return true;
        };
        while let Some(front) = self.samples.front() {
            // The sample just pushed is never older than the cutoff
            if front.timestamp < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }

        true
    }

    /// Oldest retained sample
    pub fn front(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Newest retained sample
    pub fn back(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}
