//! Login completion: identity upsert followed by session token issuance

use tracing::{error, info};

use super::models::{SessionResponse, SessionUser};
use crate::common::{safe_email_log, ApiError, AppState, Validator};
use crate::profile::{upsert_profile, IdentityAssertion, IdentityAssertionValidator};
use crate::services::google::GoogleUserInfo;

/// Turns provider claims into an assertion. Claims without subject or email fail
/// the callback like any other upstream fault.
pub fn assertion_from_userinfo(info: GoogleUserInfo) -> Result<IdentityAssertion, ApiError> {
    let assertion = IdentityAssertion::new(
        info.sub.unwrap_or_default(),
        info.email.unwrap_or_default(),
        info.name.unwrap_or_default(),
    );

    let result = IdentityAssertionValidator.validate(&assertion);
    if !result.is_valid {
        return Err(ApiError::OAuthFailed(format!(
            "Invalid user info from Google: {}",
            result.summary()
        )));
    }

    Ok(assertion)
}

/// Upserts the profile for `assertion` and mints a bearer token for it.
pub async fn issue_session(
    state: &AppState,
    assertion: &IdentityAssertion,
) -> Result<SessionResponse, ApiError> {
    let pool = state.db()?;
    let user_id = state
        .run_db("upsert_profile", upsert_profile(pool, assertion))
        .await?;

    let access_token = state.tokens.issue(&user_id).map_err(|e| {
        error!(error = %e, user_id = %user_id, "JWT encoding error during login");
        ApiError::InternalServer("jwt error".to_string())
    })?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&assertion.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    Ok(SessionResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: SessionUser {
            id: user_id,
            email: assertion.email.clone(),
            name: assertion.name.clone(),
        },
    })
}
