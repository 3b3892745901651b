//! Authentication handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_types::{Credentials, UserProfile};

use crate::error::ApiResult;
use crate::extractors::BearerClaims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(req: CredentialsRequest) -> Self {
        Credentials::new(req.email, req.password)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub issuer: String,
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/register
///
/// Create a user from an e-mail and password
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state.auth.register(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/v1/login
///
/// Exchange an e-mail and password for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let access_token = state.auth.login(&req.into()).await?;
    Ok(Json(LoginResponse { access_token }))
}

/// GET /api/v1/me
///
/// Identity carried by the presented bearer token
pub async fn me(BearerClaims(claims): BearerClaims) -> ApiResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        expires_at: claims.expires_at(),
        user_id: claims.sub,
        issuer: claims.iss,
    }))
}
