//! Run command implementation

use crate::config::Config;
use crate::engine::{Scanner, SpikeEngine};
use crate::market::{GammaClient, GammaConfig};
use crate::notify::DiscordNotifier;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub struct RunArgs {}

impl RunArgs {
    /// Run the scanner until Ctrl+C
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let source = GammaClient::with_config(GammaConfig::from(&config.source))?;

        if config.notifier.webhook_url.is_none() {
            tracing::warn!("No Discord webhook URL configured; alerts will only be logged");
        }
        let notifier = DiscordNotifier::new(
            config.notifier.webhook_url.clone(),
            Duration::from_secs(config.scanner.health_check_interval_secs),
        )?;

        let mut scanner = Scanner::new(
            SpikeEngine::new(config),
            Arc::new(source),
            Arc::new(notifier),
            &config.scanner,
        );

        scanner.run(shutdown_signal()).await;
        Ok(())
    }
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
    }
}
