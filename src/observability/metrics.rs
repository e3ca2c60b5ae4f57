//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define bridge metrics (connections, generations, records)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `bridge_connections_total` (counter): client connections accepted
//! - `bridge_connections_active` (gauge): current connection count
//! - `bridge_generations_total` (counter): backend streams opened
//! - `bridge_generations_superseded_total` (counter): generations replaced by a newer value
//! - `bridge_generations_ended_total` (counter): stream endings by reason
//! - `bridge_backend_open_failures_total` (counter): failed stream opens
//! - `bridge_records_relayed_total` (counter): records delivered to clients
//! - `bridge_stale_records_dropped_total` (counter): records suppressed after supersession
//! - `bridge_malformed_values_total` (counter): inbound frames that failed to parse
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Supersession has its own counter; the ended counter's reason label
//!   gives each relay's exit cause

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record an accepted client connection.
pub fn connection_opened() {
    counter!("bridge_connections_total").increment(1);
    gauge!("bridge_connections_active").increment(1.0);
}

/// Record a closed client connection.
pub fn connection_closed() {
    gauge!("bridge_connections_active").decrement(1.0);
}

/// Record a successfully opened backend stream.
pub fn generation_started() {
    counter!("bridge_generations_total").increment(1);
}

/// Record a generation being replaced by a newer request value.
pub fn generation_superseded() {
    counter!("bridge_generations_superseded_total").increment(1);
}

/// Record a generation ending, tagged with why it ended.
pub fn generation_ended(reason: &'static str) {
    counter!("bridge_generations_ended_total", "reason" => reason).increment(1);
}

/// Record a backend stream open that failed.
pub fn backend_open_failed() {
    counter!("bridge_backend_open_failures_total").increment(1);
}

/// Record one record delivered to a client.
pub fn record_relayed() {
    counter!("bridge_records_relayed_total").increment(1);
}

/// Record a stale record suppressed by the write gate.
pub fn stale_record_dropped() {
    counter!("bridge_stale_records_dropped_total").increment(1);
}

/// Record an inbound frame that did not parse to a finite value.
pub fn malformed_value() {
    counter!("bridge_malformed_values_total").increment(1);
}
