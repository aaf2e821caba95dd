/// Health endpoints for orchestration probes.
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

/// Overall service health. Reports unhealthy if the database is unreachable.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": "blog-service",
                "error": "database unreachable",
            }))
        }
    }
}

/// Readiness probe: checks the database and reports per-dependency status.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Not ready")
    )
)]
pub async fn readiness(pool: web::Data<PgPool>) -> HttpResponse {
    let started = std::time::Instant::now();
    let postgres_ok = sqlx::query("SELECT 1").execute(pool.get_ref()).await.is_ok();
    let latency_ms = started.elapsed().as_millis() as u64;

    let body = json!({
        "ready": postgres_ok,
        "checks": {
            "postgres": {
                "ok": postgres_ok,
                "latency_ms": latency_ms,
            },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if postgres_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

/// Liveness probe: process is up, no dependency checks.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "alive": true }))
}
