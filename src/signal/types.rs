//! Signal types

use crate::history::Sample;
use crate::market::{MarketSnapshot, MARKET_PAGE_URL};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Label attached to a fired alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertCategory {
    /// Price moved by at least the configured threshold
    Spike,
    /// Price crossed into near-certain territory
    Resolve,
    /// Price crossed into favorite territory
    Flip,
    /// Large volume increase
    Whale,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Spike => "SPIKE",
            AlertCategory::Resolve => "RESOLVE",
            AlertCategory::Flip => "FLIP",
            AlertCategory::Whale => "WHALE",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every trigger condition evaluated for one reference/current pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggers {
    pub spike: bool,
    pub flip: bool,
    pub resolve: bool,
    pub whale: bool,
}

impl Triggers {
    /// True if any condition holds
    pub fn any(&self) -> bool {
        self.spike || self.flip || self.resolve || self.whale
    }
}

/// The parts of a market an alert needs for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRef {
    pub id: String,
    pub question: String,
    pub slug: Option<String>,
    pub liquidity: Option<Decimal>,
}

impl MarketRef {
    /// Link to the market page
    pub fn url(&self) -> String {
        let key = self.slug.as_deref().unwrap_or(&self.id);
        format!("{}/{}", MARKET_PAGE_URL, key)
    }
}

impl From<&MarketSnapshot> for MarketRef {
    fn from(snapshot: &MarketSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            question: snapshot.question.clone(),
            slug: snapshot.slug.clone(),
            liquidity: snapshot.liquidity,
        }
    }
}

/// A classified momentum event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Unique alert identifier
    pub id: Uuid,
    /// Market the alert is about
    pub market: MarketRef,
    /// Presentation label
    pub category: AlertCategory,
    /// All conditions that held
    pub triggers: Triggers,
    /// Oldest sample in the window
    pub reference: Sample,
    /// Sample from this cycle
    pub current: Sample,
    /// Volume traded between reference and current
    pub volume_delta: Decimal,
}

impl AlertEvent {
    /// Price change since the reference sample
    pub fn price_change(&self) -> Decimal {
        self.current.price - self.reference.price
    }

    /// Time between reference and current samples
    pub fn elapsed(&self) -> Duration {
        self.current.timestamp - self.reference.timestamp
    }

    /// Short elapsed label: seconds under a minute, whole minutes otherwise
    pub fn elapsed_label(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

/// Format a duration as `45s` or `7m`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m", secs / 60)
    }
}
