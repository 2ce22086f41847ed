//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub storage: &'static str,
}

/// `GET /health`: 200 when session storage answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    if state.sessions.health_check().await {
        let body = HealthStatus {
            status: "ok",
            storage: "ok",
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = HealthStatus {
            status: "degraded",
            storage: "unavailable",
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}
