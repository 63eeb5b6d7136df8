//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_http_requests_total` (counter): requests by method, route, status
//! - `catalog_http_request_duration_seconds` (histogram): latency by route
//! - `catalog_upstream_requests_total` (counter): object store calls by
//!   method, resource kind, outcome
//! - `catalog_upstream_duration_seconds` (histogram): time to upstream headers
//!
//! # Design Decisions
//! - Route label is the matched route template, never the raw path
//! - Streaming duration is not measured; latency stops at response headers

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "catalog_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "catalog_http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call. `status` is `None` when no response arrived.
pub fn record_upstream(method: &str, kind: &str, status: Option<StatusCode>, start: Instant) {
    let outcome = match status {
        Some(status) => status.as_u16().to_string(),
        None => "error".to_string(),
    };
    counter!(
        "catalog_upstream_requests_total",
        "method" => method.to_string(),
        "kind" => kind.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "catalog_upstream_duration_seconds",
        "method" => method.to_string(),
        "kind" => kind.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Middleware recording every request against its matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(method.as_str(), &route, response.status().as_u16(), start);
    response
}
