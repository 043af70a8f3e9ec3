//! Prometheus metrics

use crate::signal::AlertCategory;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Listing fetch for one cycle
    Fetch,
    /// Engine pass over one cycle's snapshots
    Processing,
    /// Whole poll cycle
    Cycle,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Markets returned by the last fetch
    MarketsFetched,
    /// Markets that passed the filter in the last cycle
    EligibleMarkets,
    /// Markets with a history window
    TrackedMarkets,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Completed poll cycles
    Cycles,
    /// Alerts held back by the cooldown
    AlertsSuppressed,
    /// Failed listing page requests
    FetchErrors,
    /// Failed notification deliveries
    NotifyErrors,
}

/// Start the Prometheus HTTP exporter on all interfaces
pub(super) fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Fetch => "polyspike_fetch_duration_ms",
        LatencyMetric::Processing => "polyspike_processing_duration_ms",
        LatencyMetric::Cycle => "polyspike_cycle_duration_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::MarketsFetched => "polyspike_markets_fetched",
        GaugeMetric::EligibleMarkets => "polyspike_eligible_markets",
        GaugeMetric::TrackedMarkets => "polyspike_tracked_markets",
    };

    metrics::gauge!(metric_name).set(value);
}

/// Add to a counter
pub fn increment_counter(metric: CounterMetric, value: u64) {
    let metric_name = match metric {
        CounterMetric::Cycles => "polyspike_cycles_total",
        CounterMetric::AlertsSuppressed => "polyspike_alerts_suppressed_total",
        CounterMetric::FetchErrors => "polyspike_fetch_errors_total",
        CounterMetric::NotifyErrors => "polyspike_notify_errors_total",
    };

    metrics::counter!(metric_name).increment(value);
}

/// Count a dispatched alert by category
pub fn record_alert(category: AlertCategory) {
    metrics::counter!("polyspike_alerts_total", "category" => category.as_str()).increment(1);
}
