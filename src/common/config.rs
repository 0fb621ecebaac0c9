// src/common/config.rs
//! Process-wide configuration loaded once from the environment

use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/google/callback";
const DEFAULT_JWT_SECRET: &str = "replace_with_strong_secret";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub oauth_redirect_uri: String,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub db_pool_size: u32,
    pub db_max_overflow: u32,
    pub db_timeout: Duration,
    pub http_timeout: Duration,
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            database_url: non_empty_var("DATABASE_URL"),
            google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            google_client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            oauth_redirect_uri: env::var("OAUTH_REDIRECT_URI")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string()),
            jwt_secret,
            jwt_expires_in: Duration::from_secs(parse_var("JWT_EXPIRES_IN_HOURS", 24u64) * 3600),
            db_pool_size: parse_var("DB_POOL_SIZE", 5),
            db_max_overflow: parse_var("DB_MAX_OVERFLOW", 10),
            db_timeout: Duration::from_secs(parse_var("DB_TIMEOUT_SECS", 10)),
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30)),
            cookie_secure: env::var("COOKIE_SECURE")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                == "true",
            cors_origins,
            port: parse_var("PORT", 8080),
        }
    }

    /// Both halves of the Google client credentials, if configured.
    pub fn google_credentials(&self) -> Option<(&str, &str)> {
        match (&self.google_client_id, &self.google_client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Upper bound on open connections: the baseline plus the overflow allowance.
    pub fn db_max_connections(&self) -> u32 {
        self.db_pool_size + self.db_max_overflow
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, "Ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration used by tests; no environment access.
    pub fn for_tests() -> Self {
        Self {
            database_url: Some("sqlite::memory:".to_string()),
            google_client_id: Some("test_client_id".to_string()),
            google_client_secret: Some("test_client_secret".to_string()),
            oauth_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            jwt_secret: "test_secret_key".to_string(),
            jwt_expires_in: Duration::from_secs(3600),
            db_pool_size: 1,
            db_max_overflow: 0,
            db_timeout: Duration::from_secs(5),
            http_timeout: Duration::from_secs(5),
            cookie_secure: false,
            cors_origins: Vec::new(),
            port: 0,
        }
    }
}
