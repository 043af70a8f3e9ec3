//! Discord webhook notifier

use super::{BotStatus, Notifier, NotifyError};
use crate::signal::{AlertCategory, AlertEvent};
use crate::telemetry::{increment_counter, CounterMetric};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

const FOOTER: &str = "Polymarket Spike Bot";

const COLOR_GREEN: u32 = 5763719;
const COLOR_RED: u32 = 15548997;
const COLOR_GOLD: u32 = 16776960;
const COLOR_BLUE: u32 = 3447003;
const COLOR_PURPLE: u32 = 10181046;

/// Discord embed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

/// Inline name/value pair in an embed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    embeds: [&'a Embed; 1],
}

/// Posts embeds to a Discord webhook
///
/// Without a webhook URL every send is skipped; detection keeps running.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Option<String>,
    health_interval: Duration,
}

impl DiscordNotifier {
    /// Create a notifier
    ///
    /// `health_interval` is only used to tell readers when the next health
    /// check is due.
    pub fn new(webhook_url: Option<String>, health_interval: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            webhook_url,
            health_interval,
        })
    }

    /// Whether a webhook is configured
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn post(&self, url: &str, embed: &Embed) -> Result<(), NotifyError> {
        let payload = WebhookPayload { embeds: [embed] };
        let response = self.client.post(url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send_alert(&self, alert: &AlertEvent) {
        let Some(url) = self.webhook_url.as_deref() else {
            tracing::warn!(market_id = %alert.market.id, "No Discord webhook URL set. Skipping alert.");
            return;
        };

        match self.post(url, &alert_embed(alert)).await {
            Ok(()) => tracing::info!(
                alert_id = %alert.id,
                question = %alert.market.question,
                category = %alert.category,
                "Alert sent"
            ),
            Err(e) => {
                increment_counter(CounterMetric::NotifyErrors, 1);
                tracing::error!(alert_id = %alert.id, error = %e, "Failed to send Discord alert");
            }
        }
    }

    async fn send_status(&self, status: BotStatus) {
        let Some(url) = self.webhook_url.as_deref() else {
            return;
        };

        if let Err(e) = self.post(url, &status_embed(status)).await {
            increment_counter(CounterMetric::NotifyErrors, 1);
            tracing::warn!(%status, error = %e, "Failed to send status update");
        }
    }

    async fn send_health_check(&self, markets_scanned: usize) {
        let Some(url) = self.webhook_url.as_deref() else {
            return;
        };

        match self
            .post(url, &health_embed(markets_scanned, self.health_interval))
            .await
        {
            Ok(()) => tracing::info!(markets_scanned, "Sent health check"),
            Err(e) => {
                increment_counter(CounterMetric::NotifyErrors, 1);
                tracing::error!(error = %e, "Failed to send health check");
            }
        }
    }
}

/// Build the embed for a fired alert
pub fn alert_embed(alert: &AlertEvent) -> Embed {
    let change = alert.price_change();
    let question = &alert.market.question;

    let (title, color) = match alert.category {
        AlertCategory::Spike => {
            let direction = if change > Decimal::ZERO {
                "📈 UP"
            } else {
                "📉 DOWN"
            };
            let color = if change < Decimal::ZERO {
                COLOR_RED
            } else {
                COLOR_GREEN
            };
            (format!("{} SPIKE: {}", direction, question), color)
        }
        AlertCategory::Flip => (format!("🔀 FLIP ALERT: {}", question), COLOR_GOLD),
        AlertCategory::Resolve => (format!("🏁 RESOLVE ALERT: {}", question), COLOR_BLUE),
        AlertCategory::Whale => (format!("🐋 WHALE ALERT: {}", question), COLOR_PURPLE),
    };

    let mut description = format!(
        "Price moved **${}** in {}.",
        format_signed(change),
        alert.elapsed_label()
    );
    if alert.category == AlertCategory::Whale {
        description.push_str(&format!(
            "\n**Volume Delta**: +${} 💰",
            format_thousands(alert.volume_delta)
        ));
    }
    description.push_str(&format!("\n\n💡 **ADVICE**: {}", advice(alert.category, change)));

    let liquidity = alert
        .market
        .liquidity
        .map(|l| format!("${}", format_thousands(l)))
        .unwrap_or_else(|| "N/A".to_string());

    Embed {
        title,
        description,
        url: Some(alert.market.url()),
        color,
        fields: vec![
            field("Current Price", format!("${:.3}", alert.current.price)),
            field("Previous Price", format!("${:.3}", alert.reference.price)),
            field("Liquidity", liquidity),
        ],
        footer: EmbedFooter {
            text: format!("{} • {}", FOOTER, alert.category),
        },
    }
}

/// Build the online/offline embed
pub fn status_embed(status: BotStatus) -> Embed {
    let color = match status {
        BotStatus::Online => COLOR_GREEN,
        BotStatus::Offline => COLOR_RED,
    };

    Embed {
        title: format!("Bot Status: {}", status),
        description: format!("The Polymarket Spike Bot is now **{}**.", status),
        url: None,
        color,
        fields: vec![],
        footer: EmbedFooter {
            text: FOOTER.to_string(),
        },
    }
}

/// Build the periodic health check embed
pub fn health_embed(markets_scanned: usize, interval: Duration) -> Embed {
    let minutes = (interval.as_secs() / 60).max(1);

    Embed {
        title: "💚 Bot Health Check".to_string(),
        description: format!(
            "**Status**: OPERATIONAL\n**Markets Scanned**: {}\n**Next Check**: in {} mins.",
            markets_scanned, minutes
        ),
        url: None,
        color: COLOR_BLUE,
        fields: vec![],
        footer: EmbedFooter {
            text: FOOTER.to_string(),
        },
    }
}

fn field(name: &str, value: String) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value,
        inline: true,
    }
}

fn advice(category: AlertCategory, change: Decimal) -> &'static str {
    match category {
        AlertCategory::Whale => {
            "🐋 **WHALE SIGHTING**: Huge volume spike! Smart money might be taking a position."
        }
        AlertCategory::Flip => {
            "🔀 **THE FLIP**: Market has flipped to favorite (>50c). Momentum is shifting!"
        }
        AlertCategory::Resolve => "🏁 **RESOLVED?**: Price hit 99c. Market might be ending.",
        AlertCategory::Spike if change > Decimal::ZERO => {
            "🚀 **BULLISH MOMENTUM**: Price is surging! Consider **Buying YES** if you believe the news is real."
        }
        AlertCategory::Spike => {
            "🔻 **BEARISH DIP**: Price is crashing! Consider **Selling YES** to stop loss, or **Buying NO**."
        }
    }
}

/// Two decimals with an explicit sign
fn format_signed(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("-{:.2}", rounded.abs())
    } else {
        format!("+{:.2}", rounded.abs())
    }
}

/// Whole units with comma thousands separators
fn format_thousands(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < Decimal::ZERO {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
