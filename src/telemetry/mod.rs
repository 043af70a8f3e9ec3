//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::init_logging;
pub use self::metrics::{
    increment_counter, record_alert, record_latency, set_gauge, CounterMetric, GaugeMetric,
    LatencyMetric,
};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(
        &config.log_level,
        config.log_format,
        config.log_file.as_deref(),
    )?;

    if let Some(port) = config.metrics_port {
        self::metrics::install_exporter(port)?;
        tracing::info!(port, "Prometheus metrics exporter listening");
    }

    Ok(())
}
