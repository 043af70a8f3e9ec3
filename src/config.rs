//! Configuration types for poly-spike

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Discord webhook URL
pub const WEBHOOK_ENV_VAR: &str = "DISCORD_WEBHOOK_URL";

/// Env file read at startup, before environment overrides are applied
pub const DOTENV_FILE: &str = ".env";

/// Upper bound for `history.window_secs` and `detection.cooldown_secs` (one year)
pub const MAX_SPAN_SECS: u64 = 365 * 24 * 60 * 60;

/// Root configuration structure
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub history: HistoryConfig,
    pub detection: DetectionConfig,
    pub filter: FilterConfig,
    pub source: SourceConfig,
    pub notifier: NotifierConfig,
    pub telemetry: TelemetryConfig,
}

/// Poll loop timing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Target duration of one poll cycle (seconds)
    pub poll_interval_secs: u64,
    /// Minimum gap between health check notifications (seconds)
    pub health_check_interval_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            health_check_interval_secs: 600,
        }
    }
}

/// Rolling history retention
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// How far back samples are kept (seconds)
    pub window_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { window_secs: 600 }
    }
}

/// Trigger thresholds and alert rate limiting
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Absolute price move that counts as a spike
    pub price_change_threshold: Decimal,
    /// Volume increase within the window that counts as a whale
    pub whale_volume_threshold: Decimal,
    /// Minimum gap between two alerts for the same market (seconds)
    pub cooldown_secs: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            price_change_threshold: dec!(0.10),
            whale_volume_threshold: dec!(50000),
            cooldown_secs: 300,
        }
    }
}

/// Market eligibility
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Markets below this liquidity are ignored
    pub min_liquidity: Decimal,
    /// Markets carrying any of these tags are ignored (case-insensitive)
    pub excluded_tags: Vec<String>,
}

/// Sports categories excluded by default
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &[
    "sports",
    "nfl",
    "nba",
    "soccer",
    "football",
    "golf",
    "formula 1",
    "tennis",
    "mlb",
    "nhl",
    "cricket",
    "rugby",
    "mma",
    "ufc",
    "boxing",
];

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_liquidity: dec!(5000),
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Gamma listing source
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Markets per page request
    pub page_size: usize,
    /// Markets walked in the default ordering
    pub hot_count: usize,
    /// Markets walked newest-first
    pub new_count: usize,
    /// Pause between page requests (milliseconds)
    pub page_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: crate::market::GAMMA_API_URL.to_string(),
            timeout_secs: 10,
            page_size: 100,
            hot_count: 400,
            new_count: 200,
            page_delay_ms: 300,
        }
    }
}

/// Notification delivery
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Discord webhook; delivery is disabled when unset
    pub webhook_url: Option<String>,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Append logs to this file as well as stdout
    pub log_file: Option<PathBuf>,
    /// Prometheus exporter port; disabled when unset
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_file: None,
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load a dotenv file into the process environment
    ///
    /// Variables already set in the environment are kept. Returns false if the
    /// file does not exist.
    pub fn load_env_file(path: impl AsRef<Path>) -> anyhow::Result<bool> {
        match dotenvy::from_path(path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.not_found() => Ok(false),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to load {}: {}",
                path.as_ref().display(),
                e
            )),
        }
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(WEBHOOK_ENV_VAR) {
            self.apply_webhook_override(Some(url));
        }
        self
    }

    fn apply_webhook_override(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.notifier.webhook_url = Some(url);
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.history.window_secs == 0 {
            anyhow::bail!("history.window_secs must be greater than zero");
        }
        if self.history.window_secs > MAX_SPAN_SECS {
            anyhow::bail!("history.window_secs must be at most {}", MAX_SPAN_SECS);
        }
        if self.detection.cooldown_secs > MAX_SPAN_SECS {
            anyhow::bail!("detection.cooldown_secs must be at most {}", MAX_SPAN_SECS);
        }
        if self.source.page_size == 0 {
            anyhow::bail!("source.page_size must be greater than zero");
        }
        if self.detection.price_change_threshold.is_sign_negative() {
            anyhow::bail!("detection.price_change_threshold must not be negative");
        }
        if self.detection.whale_volume_threshold.is_sign_negative() {
            anyhow::bail!("detection.whale_volume_threshold must not be negative");
        }
        if self.filter.min_liquidity.is_sign_negative() {
            anyhow::bail!("filter.min_liquidity must not be negative");
        }
        Ok(())
    }
}
