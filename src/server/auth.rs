//! API-key authentication.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderName};

use super::error::ApiError;
use super::AppState;

static API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Extractor that rejects the request unless it carries the configured key.
///
/// List it first among a handler's arguments so nothing else runs for an
/// unauthenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts.headers.get(&API_KEY).and_then(|v| v.to_str().ok());
        if state.settings.api_key_matches(presented) {
            Ok(RequireApiKey)
        } else {
            Err(ApiError::Forbidden)
        }
    }
}
