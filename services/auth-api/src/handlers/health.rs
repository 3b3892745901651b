//! Health check handler

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/v1/health
///
/// Healthy only when the database answers.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match warden_db::ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "healthy" })),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "unhealthy" }),
            )
        }
    }
}
