//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gst_gateway_upstream_requests_total` (counter): outbound calls by outcome
//! - `gst_gateway_upstream_request_duration_seconds` (histogram): outbound latency
//! - `gst_gateway_fanout_sections_total` (counter): sections dispatched by fan-out
//! - `gst_gateway_fanout_failures_total` (counter): sections that ended in failure
//! - `gst_gateway_fanout_duration_seconds` (histogram): join-to-merge latency
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_upstream_call(outcome: &'static str, started: Instant) {
    metrics::counter!("gst_gateway_upstream_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("gst_gateway_upstream_request_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_fanout(sections: usize, failures: usize, started: Instant) {
    metrics::counter!("gst_gateway_fanout_sections_total").increment(sections as u64);
    metrics::counter!("gst_gateway_fanout_failures_total").increment(failures as u64);
    metrics::histogram!("gst_gateway_fanout_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}
