use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::error;

use crate::config::DataMode;
use crate::controller::SessionRegistry;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    mode: DataMode,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Open visitor sessions, reported by `/health` only
    #[serde(skip_serializing_if = "Option::is_none")]
    sessions: Option<usize>,
}

/// Health check endpoint
///
/// General health check including reachability of the job source.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(registry: web::Data<SessionRegistry>) -> impl Responder {
    let health = registry.health().await;
    let sessions = Some(registry.active().await);

    if health.available {
        HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            mode: health.mode,
            source: "available".to_string(),
            error: None,
            sessions,
        })
    } else {
        error!("Health check failed: {:?}", health.error);
        HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "unhealthy".to_string(),
            mode: health.mode,
            source: "unavailable".to_string(),
            error: health.error,
            sessions,
        })
    }
}

/// Readiness check endpoint
///
/// Returns 503 while the job source is unavailable; recovers once it returns.
#[get("/ready")]
async fn readiness_check(registry: web::Data<SessionRegistry>) -> impl Responder {
    let health = registry.health().await;

    if health.available {
        HttpResponse::Ok().json(HealthResponse {
            status: "ready".to_string(),
            mode: health.mode,
            source: "available".to_string(),
            error: None,
            sessions: None,
        })
    } else {
        error!("Readiness check failed: job source unavailable: {:?}", health.error);
        HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "not_ready".to_string(),
            mode: health.mode,
            source: "unavailable".to_string(),
            error: health.error,
            sessions: None,
        })
    }
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not check the job source.
#[get("/live")]
async fn liveness_check(registry: web::Data<SessionRegistry>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        mode: registry.mode(),
        source: "not_checked".to_string(),
        error: None,
        sessions: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
