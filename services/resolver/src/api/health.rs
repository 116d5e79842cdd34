//! Health check endpoints.
//!
//! Used by load balancers and orchestration systems to determine if the
//! service is healthy and ready to receive traffic.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    /// Service status: "ok" or "degraded".
    pub status: String,

    /// Service name.
    pub service: String,

    /// Service version.
    pub version: String,

    /// Current timestamp (ISO 8601).
    pub timestamp: String,

    /// Registry backend status, populated by readiness checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<ComponentStatus>,
}

/// Individual component status.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ComponentStatus {
    /// Status: "ok" or "unavailable".
    pub status: String,

    /// Optional message with details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Create health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/livez", get(livez))
}

/// Basic health check - is the service running?
///
/// A simple liveness probe that returns 200 if the server is up, without
/// checking dependencies.
async fn healthz() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "resolver".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        registry: None,
    })
}

/// Readiness check - is the service ready to receive traffic?
///
/// Checks that the registry backend is reachable. Returns 503 otherwise.
async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.registry().health_check().await;
    let ok = result.is_ok();
    let message = result.err().map(|e| e.to_string());

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" }.to_string(),
        service: "resolver".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        registry: Some(ComponentStatus {
            status: if ok { "ok" } else { "unavailable" }.to_string(),
            message,
        }),
    };

    if ok {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Liveness check with a minimal body for efficiency.
async fn livez() -> impl IntoResponse {
    StatusCode::OK
}
