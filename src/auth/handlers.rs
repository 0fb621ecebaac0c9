//! Authentication handlers

use axum::{
    extract::{Extension, Json, Query},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::OAuthCallbackParams;
use super::oauth_state::{clear_state_cookie, read_state_cookie, state_cookie, OAuthStateSigner};
use super::session::{assertion_from_userinfo, issue_session};
use crate::common::{ApiError, AppState};
use crate::profile::{find_profile_by_id, Profile};

/// GET /google/login
/// Redirects the browser to Google's consent screen
///
/// Sets the `oauth_state` cookie that the callback checks the returned
/// `state` parameter against.
pub async fn google_login(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.identity_provider()?;

    let oauth_state = OAuthStateSigner::generate_state();
    let sealed = state.oauth_state.seal(&oauth_state).map_err(|e| {
        error!(error = %e, "Failed to sign OAuth state");
        ApiError::InternalServer("Failed to start OAuth flow".to_string())
    })?;
    let cookie = state_cookie(sealed, state.config.cookie_secure);

    let auth_url = provider.authorization_url(&oauth_state);
    info!(
        redirect_uri = %state.config.oauth_redirect_uri,
        "Starting Google OAuth flow"
    );

    Ok(([(SET_COOKIE, cookie.to_string())], Redirect::to(&auth_url)))
}

/// GET /google/callback
/// Completes the code exchange, upserts the profile and returns a session token
///
/// # Response
/// ```json
/// {
///   "access_token": "<jwt>",
///   "token_type": "bearer",
///   "user": { "id": "...", "email": "...", "name": "..." }
/// }
/// ```
pub async fn google_callback(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state.identity_provider()?;

    if let Some(oauth_error) = params.error {
        warn!(oauth_error = %oauth_error, "Google OAuth returned error");
        return Err(ApiError::BadRequest(format!(
            "Google authorization failed: {}",
            oauth_error
        )));
    }

    let code = params.code.filter(|c| !c.is_empty()).ok_or_else(|| {
        warn!("No authorization code in OAuth callback");
        ApiError::BadRequest("No authorization code provided".to_string())
    })?;

    let presented_state = params.state.unwrap_or_default();
    let state_ok = read_state_cookie(&headers)
        .is_some_and(|sealed| state.oauth_state.matches(&sealed, &presented_state));
    if !state_ok {
        warn!("OAuth state missing, expired or mismatched");
        return Err(ApiError::BadRequest("invalid OAuth state".to_string()));
    }

    info!("Received OAuth callback with authorization code");

    let userinfo = match tokio::time::timeout(
        state.config.http_timeout,
        provider.fetch_identity(&code),
    )
    .await
    {
        Ok(Ok(info)) => info,
        Ok(Err(e)) => return Err(ApiError::OAuthFailed(e.to_string())),
        Err(_) => {
            return Err(ApiError::OAuthFailed(
                "identity provider request timed out".to_string(),
            ))
        }
    };

    let assertion = assertion_from_userinfo(userinfo)?;
    let session = issue_session(&state, &assertion).await?;

    let cleared = clear_state_cookie(state.config.cookie_secure);
    Ok(([(SET_COOKIE, cleared.to_string())], Json(session)))
}

/// GET /me
/// Returns the full profile of the bearer token's owner
#[axum::debug_handler]
pub async fn me_handler(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<Profile>, ApiError> {
    let pool = state.db()?;
    let profile = state
        .run_db("find_profile_by_id", find_profile_by_id(pool, &authed.id))
        .await?;

    match profile {
        Some(p) => Ok(Json(p)),
        None => {
            warn!(user_id = %authed.id, "Verified token refers to an unknown profile");
            Err(ApiError::NotFound("user not found".to_string()))
        }
    }
}
