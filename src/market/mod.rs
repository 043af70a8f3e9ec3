//! Market listing module
//!
//! Polls active Polymarket markets via the Gamma API and decides which of
//! them are worth tracking.

mod filter;
mod gamma;

pub use filter::MarketFilter;
pub use gamma::{GammaClient, GammaConfig, GAMMA_API_URL};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL for market pages on the Polymarket site
pub const MARKET_PAGE_URL: &str = "https://polymarket.com/event";

/// A market tag as returned by the listing API
///
/// Tags come back either as bare strings or as objects carrying a `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Plain(String),
    Labeled {
        #[serde(default)]
        label: String,
    },
}

impl Tag {
    /// Lowercased tag text used for matching
    pub fn normalized(&self) -> String {
        match self {
            Tag::Plain(s) => s.to_lowercase(),
            Tag::Labeled { label } => label.to_lowercase(),
        }
    }
}

/// One poll's observed state of a market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Market identifier, stable across polls
    pub id: String,
    /// Market question text
    pub question: String,
    /// URL slug for the market page
    pub slug: Option<String>,
    /// Probability-style price, absent if unpriced or unparsable
    pub price: Option<Decimal>,
    /// Cumulative traded volume
    pub volume: Decimal,
    /// Current liquidity, absent if missing or unparsable
    pub liquidity: Option<Decimal>,
    /// Raw tags
    pub tags: Vec<Tag>,
}

/// Errors from a single listing request
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response status
    #[error("Gamma API error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Response body was not a market list
    #[error("Failed to decode market page: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Supplier of the deduplicated market set for one poll cycle
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch current snapshots
    ///
    /// Partial failures should be absorbed and yield a partial set; an `Err`
    /// is treated as unrecoverable by the scanner.
    async fn fetch_snapshots(&self) -> anyhow::Result<Vec<MarketSnapshot>>;
}
