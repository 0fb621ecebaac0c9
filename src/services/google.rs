// src/services/google.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub scope: Option<String>,
    pub id_token: Option<String>,
}

/// OpenID Connect userinfo claims; every field is optional on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub email_verified: Option<bool>,
}

/// The pieces of an OAuth identity provider the login flow needs.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is redirected to, carrying the anti-forgery `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchanges an authorization code and returns the user's identity claims.
    async fn fetch_identity(&self, code: &str) -> Result<GoogleUserInfo, GoogleError>;
}

#[derive(Debug, Clone)]
pub struct GoogleService {
    config: GoogleOAuthConfig,
    client: Client,
}

impl GoogleService {
    pub fn new(config: GoogleOAuthConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }

    pub async fn get_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, GoogleError> {
        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Userinfo request failed");
            return Err(GoogleError::OAuthFailed(format!(
                "userinfo HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for GoogleService {
    fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            AUTHORIZATION_ENDPOINT,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state)
        )
    }

    async fn fetch_identity(&self, code: &str) -> Result<GoogleUserInfo, GoogleError> {
        let tokens = self.exchange_code(code).await?;
        debug!(
            has_id_token = tokens.id_token.is_some(),
            scope = ?tokens.scope,
            "Authorization code exchanged"
        );

        let userinfo = self.get_userinfo(&tokens.access_token).await?;
        if userinfo.email_verified == Some(false) {
            info!("Google account email is not verified");
        }

        Ok(userinfo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> GoogleService {
        GoogleService::new(
            GoogleOAuthConfig {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                redirect_uri: "http://localhost:8080/google/callback".to_string(),
            },
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_get_authorization_url() {
        let auth_url = test_service().authorization_url("abc123");

        assert!(auth_url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(auth_url.contains("client_id=test_client_id"));
        assert!(auth_url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fgoogle%2Fcallback"));
        assert!(auth_url.contains("response_type=code"));
        assert!(auth_url.contains("scope=openid%20email%20profile"));
        assert!(auth_url.contains("state=abc123"));
        assert!(!auth_url.contains("test_secret"));
    }

    #[test]
    fn test_userinfo_tolerates_missing_fields() {
        let info: GoogleUserInfo = serde_json::from_str(r#"{"sub": "g-1"}"#).unwrap();

        assert_eq!(info.sub.as_deref(), Some("g-1"));
        assert!(info.email.is_none());
        assert!(info.name.is_none());
    }
}
