//! Liveness, readiness and root status endpoints
//!
//! None of these require authentication.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootStatus {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            database: None,
        }
    }
}

/// GET /
pub async fn root() -> Json<RootStatus> {
    Json(RootStatus {
        status: "API is running",
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}

/// GET /health/ready
///
/// 503 while the database does not answer.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match db::health_check(state.db()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                database: Some("up"),
                ..HealthResponse::new("ready")
            }),
        ),
        // Error detail is logged by the check, not exposed to callers
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                database: Some("down"),
                ..HealthResponse::new("not_ready")
            }),
        ),
    }
}
