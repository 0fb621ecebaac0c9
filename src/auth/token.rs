//! Session token codec (HS256 JWT)

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, or past its expiry; deliberately not told apart
    #[error("invalid or expired token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies the bearer tokens handed out after login.
///
/// Tokens are never stored server-side; a token is valid when its signature
/// matches and `exp` is still in the future.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs a token for `subject_id` that expires after the configured ttl.
    pub fn issue(&self, subject_id: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            user_id: Some(subject_id.to_string()),
            iat: now,
            exp: now + self.ttl.as_secs() as usize,
        };
        self.sign(&claims)
    }

    /// Checks signature and expiry and returns the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token verification failed");
                TokenError::Invalid
            })
    }

    pub(super) fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}
