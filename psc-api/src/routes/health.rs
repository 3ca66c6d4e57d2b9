//! Health Check Endpoints
//!
//! - /health/ping - Simple liveness check
//! - /health/ready - Database connectivity check
//!
//! No authentication required for health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::DbClient;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Current database pool size, reported by the readiness probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// GET /health/ping - liveness
pub async fn ping() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        message: None,
        pool_size: None,
    })
}

/// GET /health/ready - database connectivity and pool status
pub async fn ready(State(db): State<DbClient>) -> impl IntoResponse {
    match db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: HealthStatus::Healthy,
                message: None,
                pool_size: Some(db.pool_size()),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                pool_size: Some(db.pool_size()),
            }),
        ),
    }
}

/// Build the health router with its own state.
pub fn create_router(db: DbClient) -> Router {
    Router::new()
        .route("/health/ping", get(ping))
        .route("/health/ready", get(ready))
        .with_state(db)
}
