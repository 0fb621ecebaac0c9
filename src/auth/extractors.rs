//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::{safe_token_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Verifies the bearer token and yields the profile id it was issued for.
/// Whether that profile still exists is left to the handler.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let header = match parts.headers.get(AUTHORIZATION) {
            Some(h) => h,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing authorization".into()));
            }
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                warn!("Authentication failed: Authorization header is not a Bearer credential");
                ApiError::Unauthorized("invalid authorization header".into())
            })?;

        let claims = app_state.tokens.verify(token).map_err(|e| {
            warn!(error = %e, token = %safe_token_log(token), "JWT token validation failed");
            ApiError::Unauthorized("invalid or expired token".into())
        })?;

        let user_id = claims.subject().ok_or_else(|| {
            warn!("Authentication failed: token has no user_id claim");
            ApiError::Unauthorized("invalid token payload".into())
        })?;

        debug!(user_id = %user_id, "Bearer token verified");
        Ok(AuthedUser {
            id: user_id.to_string(),
        })
    }
}
