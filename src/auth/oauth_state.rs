//! Anti-forgery `state` for the Google OAuth redirect.
//!
//! The login handler generates a random state, sends it to Google and keeps a
//! signed copy in a short-lived HttpOnly cookie. The callback accepts the
//! returned `state` only when it matches an unexpired cookie.

use axum::http::{header::COOKIE, HeaderMap};
use chrono::Utc;
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use super::token::TokenError;

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_PATH: &str = "/google";
const OAUTH_STATE_TTL_SECS: i64 = 10 * 60;
const STATE_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    state: String,
    exp: usize,
}

#[derive(Clone)]
pub struct OAuthStateSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl OAuthStateSigner {
    /// Derives its key from the session secret so a state cookie never verifies
    /// as a session token and vice versa.
    pub fn new(secret: &str) -> Self {
        let key = format!("{}:oauth-state", secret);
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
        }
    }

    pub fn generate_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect()
    }

    pub fn seal(&self, state: &str) -> Result<String, TokenError> {
        let claims = StateClaims {
            state: state.to_string(),
            exp: (Utc::now().timestamp() + OAUTH_STATE_TTL_SECS).max(0) as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// True when `sealed` is an unexpired cookie value carrying exactly `presented`.
    pub fn matches(&self, sealed: &str, presented: &str) -> bool {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<StateClaims>(sealed, &self.decoding, &validation) {
            Ok(data) => !presented.is_empty() && data.claims.state == presented,
            Err(_) => false,
        }
    }
}

pub fn state_cookie(sealed: String, secure: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, sealed))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(OAUTH_STATE_TTL_SECS))
        .build()
}

/// Expires the state cookie once the callback has consumed it.
pub fn clear_state_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .build()
}

pub fn read_state_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw.to_string()))
        .filter_map(Result::ok)
        .find(|c| c.name() == OAUTH_STATE_COOKIE)
        .map(|c| c.value().to_string())
}
