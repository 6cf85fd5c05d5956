//! Metrics collection and exposition.
//!
//! # Metrics
//! - `workflow_submissions_total` (counter): submissions by operation
//! - `workflow_failures_total` (counter): failed runs by operation
//! - `workflow_confirmation_seconds` (histogram): submit-to-commit latency
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - The Prometheus endpoint is only started when enabled in config

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const SUBMISSIONS_TOTAL: &str = "workflow_submissions_total";
pub const FAILURES_TOTAL: &str = "workflow_failures_total";
pub const CONFIRMATION_SECONDS: &str = "workflow_confirmation_seconds";

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_exporter(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_submission(operation: &'static str) {
    metrics::counter!(SUBMISSIONS_TOTAL, "operation" => operation).increment(1);
}

pub fn record_failure(operation: &'static str) {
    metrics::counter!(FAILURES_TOTAL, "operation" => operation).increment(1);
}

pub fn record_confirmation(elapsed: Duration) {
    metrics::histogram!(CONFIRMATION_SECONDS).record(elapsed.as_secs_f64());
}
