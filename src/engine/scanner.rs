//! Poll loop
//!
//! One cycle at a time: fetch the full market set, run the engine pass,
//! dispatch alerts, maybe send a health check, then sleep out the rest of the
//! poll interval. Shutdown is only observed while fetching or sleeping, so a
//! cycle that has started processing always runs to completion.

use super::SpikeEngine;
use crate::config::ScannerConfig;
use crate::market::{MarketSnapshot, SnapshotSource};
use crate::notify::{BotStatus, Notifier};
use crate::telemetry::{
    increment_counter, record_alert, record_latency, set_gauge, CounterMetric, GaugeMetric,
    LatencyMetric,
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Drives the engine from a snapshot source to a notifier
pub struct Scanner {
    engine: SpikeEngine,
    source: Arc<dyn SnapshotSource>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    health_check_interval: Duration,
    last_health_check: Instant,
}

impl Scanner {
    /// Create a scanner
    pub fn new(
        engine: SpikeEngine,
        source: Arc<dyn SnapshotSource>,
        notifier: Arc<dyn Notifier>,
        config: &ScannerConfig,
    ) -> Self {
        Self {
            engine,
            source,
            notifier,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            health_check_interval: Duration::from_secs(config.health_check_interval_secs),
            last_health_check: Instant::now(),
        }
    }

    /// Run until `shutdown` resolves or a cycle fails
    ///
    /// The offline status is sent on every exit path.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Starting spike scanner"
        );
        self.notifier.send_status(BotStatus::Online).await;
        self.last_health_check = Instant::now();

        tokio::pin!(shutdown);

        loop {
            let cycle_start = Instant::now();

            let snapshots = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping scanner");
                    break;
                }
                result = self.source.fetch_snapshots() => match result {
                    Ok(snapshots) => snapshots,
                    Err(e) => {
                        tracing::error!(error = %e, "Unexpected error, stopping scanner");
                        break;
                    }
                },
            };
            record_latency(LatencyMetric::Fetch, cycle_start.elapsed());

            self.process_cycle(&snapshots).await;

            let elapsed = cycle_start.elapsed();
            record_latency(LatencyMetric::Cycle, elapsed);

            let pause = self.poll_interval.saturating_sub(elapsed);
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping scanner");
                    break;
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }

        self.notifier.send_status(BotStatus::Offline).await;
        tracing::info!("Scanner stopped");
    }

    async fn process_cycle(&mut self, snapshots: &[MarketSnapshot]) {
        let fetched = snapshots.len();
        tracing::info!(market_count = fetched, "Fetched markets");
        set_gauge(GaugeMetric::MarketsFetched, fetched as f64);

        if !snapshots.is_empty() {
            let started = Instant::now();
            let report = self.engine.process(snapshots, Utc::now());
            record_latency(LatencyMetric::Processing, started.elapsed());

            set_gauge(GaugeMetric::EligibleMarkets, report.eligible as f64);
            set_gauge(GaugeMetric::TrackedMarkets, self.engine.history().len() as f64);
            increment_counter(CounterMetric::AlertsSuppressed, report.suppressed as u64);

            tracing::debug!(
                eligible = report.eligible,
                unpriced = report.unpriced,
                alerts = report.alerts.len(),
                suppressed = report.suppressed,
                "Cycle processed"
            );

            for alert in &report.alerts {
                record_alert(alert.category);
                self.notifier.send_alert(alert).await;
            }
        }

        if self.last_health_check.elapsed() > self.health_check_interval {
            self.notifier.send_health_check(fetched).await;
            self.last_health_check = Instant::now();
        }

        increment_counter(CounterMetric::Cycles, 1);
    }

    /// The engine driven by this scanner
    pub fn engine(&self) -> &SpikeEngine {
        &self.engine
    }
}
