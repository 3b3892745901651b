//! Axum extractors and middleware for authentication

use axum::extract::{FromRef, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use warden_auth_core::{bearer_token, Claims, API_KEY_HEADER};
use warden_types::ApiKey;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims of a validated bearer token
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

impl<S> FromRequestParts<S> for BearerClaims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_bearer(&parts.headers).ok_or(ApiError::MissingCredentials)?;
        let claims = app_state.auth.validate_bearer(token)?;

        Ok(Self(claims))
    }
}

/// Bearer token from the `Authorization` header
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

/// API key from its dedicated header. A value that is not visible ASCII is
/// treated as absent.
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Reject any request that does not carry a provisioned API key.
///
/// The admitted key is stored in the request extensions.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = extract_api_key(request.headers()).map(str::to_owned);

    match state.auth.admit(presented.as_deref()).await {
        Ok(key) => {
            request.extensions_mut().insert::<ApiKey>(key);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer a.b.c"));
        assert_eq!(extract_bearer(&headers), Some("a.b.c"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn test_extract_api_key() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_api_key(&headers), None);

        // Header names are case-insensitive
        headers.insert("x-api-key", HeaderValue::from_static("key-123"));
        assert_eq!(extract_api_key(&headers), Some("key-123"));
    }

    #[test]
    fn test_extract_api_key_non_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_bytes(b"\xffkey").unwrap());
        assert_eq!(extract_api_key(&headers), None);
    }
}
