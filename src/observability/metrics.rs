//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): total requests by method, status
//! - `api_request_duration_seconds` (histogram): latency distribution by method
//!
//! # Design Decisions
//! - Recorded by one middleware around the whole router
//! - Labels stay low-cardinality: no paths, no ids

use std::net::SocketAddr;
use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

pub fn record_request(method: &str, status: u16, started: Instant) {
    metrics::counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("api_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Middleware: `middleware::from_fn(track_requests)`.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), started);
    response
}
