//! Notification delivery
//!
//! Alerts, status changes and periodic health checks are pushed to a Discord
//! webhook. Delivery is fire-and-forget: failures are logged by the notifier
//! and never reach the scan loop.

mod discord;

pub use discord::{
    alert_embed, health_embed, status_embed, DiscordNotifier, Embed, EmbedField, EmbedFooter,
};

use crate::signal::AlertEvent;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Daemon lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotStatus {
    Online,
    Offline,
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotStatus::Online => f.write_str("ONLINE"),
            BotStatus::Offline => f.write_str("OFFLINE"),
        }
    }
}

/// Errors from a single delivery attempt
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport failure or timeout
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response status
    #[error("Webhook rejected message: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Receiver of alert, status and health notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a fired alert
    async fn send_alert(&self, alert: &AlertEvent);

    /// Announce the daemon going online or offline
    async fn send_status(&self, status: BotStatus);

    /// Periodic liveness summary
    async fn send_health_check(&self, markets_scanned: usize);
}
