//! Prometheus metrics for girder-server.
//!
//! Exposes server metrics in Prometheus format at the `/metrics` endpoint.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder and return a handle for
/// rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Describe metrics for better documentation in /metrics output
    describe_counter!(
        "girder_quota_checks_total",
        "Total quota checks, by metric and outcome"
    );
    describe_counter!(
        "girder_usage_tracked_total",
        "Total usage increments recorded, by metric"
    );
    describe_counter!(
        "girder_usage_warnings_total",
        "Total usage-warning notifications fired, by metric"
    );

    handle
}

/// Record a quota decision (advisory check or atomic consume).
pub fn record_quota_decision(metric: &'static str, allowed: bool) {
    let outcome = if allowed { "allowed" } else { "denied" };
    counter!("girder_quota_checks_total", "metric" => metric, "outcome" => outcome).increment(1);
}

/// Record one tracked usage increment.
pub fn record_usage_tracked(metric: &'static str) {
    counter!("girder_usage_tracked_total", "metric" => metric).increment(1);
}

/// Record a fired usage warning.
pub fn record_usage_warning(metric: &'static str) {
    counter!("girder_usage_warnings_total", "metric" => metric).increment(1);
}
