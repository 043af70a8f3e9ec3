//! Market eligibility filter

use super::MarketSnapshot;
use crate::config::FilterConfig;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Decides whether a snapshot is worth tracking
///
/// Markets need enough liquidity to be meaningful and must not carry any
/// excluded tag. Tag matching ignores case.
#[derive(Debug, Clone)]
pub struct MarketFilter {
    min_liquidity: Decimal,
    excluded_tags: HashSet<String>,
}

impl MarketFilter {
    /// Create a filter from configuration
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            min_liquidity: config.min_liquidity,
            excluded_tags: config
                .excluded_tags
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Check liquidity and tags
    pub fn is_eligible(&self, snapshot: &MarketSnapshot) -> bool {
        match snapshot.liquidity {
            Some(liquidity) if liquidity >= self.min_liquidity => {}
            _ => return false,
        }

        !snapshot
            .tags
            .iter()
            .any(|tag| self.excluded_tags.contains(&tag.normalized()))
    }
}
