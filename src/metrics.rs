//! Prometheus metrics for the blog service.
//!
//! Exposes request-level collectors plus domain counters and the HTTP handler
//! for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Requests by method, route pattern, and response status.
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests segmented by method, route, and status",
        &["method", "route", "status"]
    )
    .expect("failed to register http_requests_total");

    /// Request latency by method and route pattern.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method and route",
        &["method", "route"]
    )
    .expect("failed to register http_request_duration_seconds");

    /// Posts created through the create-post endpoint.
    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "posts_created_total",
        "Total posts created"
    )
    .expect("failed to register posts_created_total");

    /// Accounts created through registration.
    pub static ref USERS_REGISTERED_TOTAL: IntCounter = register_int_counter!(
        "users_registered_total",
        "Total users registered"
    )
    .expect("failed to register users_registered_total");

    /// Sessions opened at registration and login.
    pub static ref SESSIONS_OPENED_TOTAL: IntCounter = register_int_counter!(
        "sessions_opened_total",
        "Total sessions opened"
    )
    .expect("failed to register sessions_opened_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
