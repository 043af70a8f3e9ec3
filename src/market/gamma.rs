//! Gamma API client for market listings
//!
//! Each poll walks two listings of open markets: the default ("hot") ordering,
//! which surfaces the most active markets, and an id-descending ("new")
//! ordering so freshly created markets are seen early. Pages from both are
//! merged into one set keyed by market id, first sighting wins.

use super::{MarketSnapshot, SnapshotSource, SourceError, Tag};
use crate::config::SourceConfig;
use crate::telemetry::{increment_counter, CounterMetric};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

/// Gamma API base URL
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Configuration for the Gamma client
#[derive(Debug, Clone)]
pub struct GammaConfig {
    /// Base URL for the Gamma API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Markets requested per page
    pub page_size: usize,
    /// Markets to walk in the default ordering
    pub hot_count: usize,
    /// Markets to walk in newest-first ordering
    pub new_count: usize,
    /// Pause between page requests
    pub page_delay: Duration,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: GAMMA_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            page_size: 100,
            hot_count: 400,
            new_count: 200,
            page_delay: Duration::from_millis(300),
        }
    }
}

impl From<&SourceConfig> for GammaConfig {
    fn from(config: &SourceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            page_size: config.page_size,
            hot_count: config.hot_count,
            new_count: config.new_count,
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }
}

/// Market listing ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    /// API default ordering
    Hot,
    /// Newest markets first
    New,
}

impl Listing {
    fn name(self) -> &'static str {
        match self {
            Listing::Hot => "hot",
            Listing::New => "new",
        }
    }

    fn order_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Listing::Hot => &[],
            Listing::New => &[("order", "id"), ("ascending", "false")],
        }
    }
}

/// Client for Polymarket's Gamma API
pub struct GammaClient {
    config: GammaConfig,
    client: Client,
}

impl GammaClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: GammaConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { config, client })
    }

    /// Fetch the merged, deduplicated set of open markets
    ///
    /// A failed page ends its listing; whatever was collected so far is kept.
    pub async fn fetch_markets(&self) -> Vec<MarketSnapshot> {
        let mut markets = Vec::new();
        let mut seen = HashSet::new();

        self.collect_listing(Listing::Hot, self.config.hot_count, &mut markets, &mut seen)
            .await;
        self.collect_listing(Listing::New, self.config.new_count, &mut markets, &mut seen)
            .await;

        tracing::debug!(market_count = markets.len(), "Fetched market listings");
        markets
    }

    async fn collect_listing(
        &self,
        listing: Listing,
        count: usize,
        markets: &mut Vec<MarketSnapshot>,
        seen: &mut HashSet<String>,
    ) {
        let page_size = self.config.page_size.max(1);

        for offset in (0..count).step_by(page_size) {
            let page = match self.fetch_page(listing, offset).await {
                Ok(page) => page,
                Err(e) => {
                    increment_counter(CounterMetric::FetchErrors, 1);
                    tracing::error!(
                        listing = listing.name(),
                        offset,
                        error = %e,
                        "Error fetching markets page"
                    );
                    break;
                }
            };

            if page.is_empty() {
                break;
            }

            for raw in page {
                let Some(snapshot) = decode_market(raw) else {
                    continue;
                };
                if seen.insert(snapshot.id.clone()) {
                    markets.push(snapshot);
                }
            }

            if !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }
    }

    /// Fetch one raw page of markets
    async fn fetch_page(&self, listing: Listing, offset: usize) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/markets", self.config.base_url);

        tracing::debug!(url = %url, listing = listing.name(), offset, "Fetching markets page");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("limit", self.config.page_size.to_string()),
                ("offset", offset.to_string()),
                ("closed", "false".to_string()),
            ])
            .query(listing.order_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let body = response.text().await?;
        let page: MarketPage = serde_json::from_str(&body)?;
        Ok(page.into_items())
    }
}

#[async_trait]
impl SnapshotSource for GammaClient {
    async fn fetch_snapshots(&self) -> anyhow::Result<Vec<MarketSnapshot>> {
        Ok(self.fetch_markets().await)
    }
}

/// Page body: either a bare array or wrapped in `data`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MarketPage {
    List(Vec<Value>),
    Wrapped {
        #[serde(default)]
        data: Vec<Value>,
    },
}

impl MarketPage {
    fn into_items(self) -> Vec<Value> {
        match self {
            MarketPage::List(items) => items,
            MarketPage::Wrapped { data } => data,
        }
    }
}

/// Raw market response from Gamma API
///
/// Numeric fields arrive as numbers or strings depending on the endpoint, so
/// they are kept as raw JSON and parsed leniently.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaMarket {
    id: Option<Value>,
    question: Option<String>,
    slug: Option<String>,
    last_trade_price: Option<Value>,
    best_ask: Option<Value>,
    volume: Option<Value>,
    liquidity: Option<Value>,
    tags: Option<Vec<Value>>,
}

impl GammaMarket {
    fn into_snapshot(self) -> Option<MarketSnapshot> {
        let id = parse_id(self.id.as_ref()?)?;

        // Last trade first, best ask as fallback; zero counts as unpriced
        let price = [&self.last_trade_price, &self.best_ask]
            .into_iter()
            .flatten()
            .filter_map(parse_decimal)
            .find(|p| !p.is_zero());

        Some(MarketSnapshot {
            id,
            question: self.question.unwrap_or_default(),
            slug: self.slug.filter(|s| !s.is_empty()),
            price,
            volume: self
                .volume
                .as_ref()
                .and_then(parse_decimal)
                .unwrap_or(Decimal::ZERO),
            liquidity: self.liquidity.as_ref().and_then(parse_decimal),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(parse_tag)
                .collect(),
        })
    }
}

/// Decode one listing entry, skipping entries that are not market objects
fn decode_market(raw: Value) -> Option<MarketSnapshot> {
    match serde_json::from_value::<GammaMarket>(raw) {
        Ok(market) => market.into_snapshot(),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping undecodable market entry");
            None
        }
    }
}

fn parse_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a number or numeric string into a decimal
fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_tag(value: Value) -> Tag {
    match value {
        Value::String(s) => Tag::Plain(s),
        Value::Object(map) => Tag::Labeled {
            label: map
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        other => Tag::Plain(other.to_string()),
    }
}
