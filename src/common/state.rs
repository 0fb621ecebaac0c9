// Application state shared across all modules

use sqlx::SqlitePool;
use std::future::Future;
use std::sync::Arc;
use tracing::error;

use super::{config::AppConfig, ApiError};
use crate::auth::{OAuthStateSigner, TokenCodec};
use crate::services::IdentityProvider;

/// Application state built once at startup and shared read-only by every request
pub struct AppState {
    pub db: Option<SqlitePool>,
    pub config: AppConfig,
    pub tokens: TokenCodec,
    pub oauth_state: OAuthStateSigner,
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Option<SqlitePool>,
        identity_provider: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        let tokens = TokenCodec::new(&config.jwt_secret, config.jwt_expires_in);
        let oauth_state = OAuthStateSigner::new(&config.jwt_secret);

        Self {
            db,
            config,
            tokens,
            oauth_state,
            identity_provider,
        }
    }

    /// The connection pool, or a configuration error when no DATABASE_URL was given
    pub fn db(&self) -> Result<&SqlitePool, ApiError> {
        self.db.as_ref().ok_or_else(|| {
            ApiError::Configuration("DATABASE_URL environment variable is not set".to_string())
        })
    }

    pub fn identity_provider(&self) -> Result<&Arc<dyn IdentityProvider>, ApiError> {
        self.identity_provider
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("OAuth credentials not configured".to_string()))
    }

    /// Runs a database future under the configured per-operation timeout.
    pub async fn run_db<T, F>(&self, operation: &'static str, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.config.db_timeout, fut).await {
            Ok(result) => result.map_err(ApiError::DatabaseError),
            Err(_) => {
                error!(
                    operation = operation,
                    timeout_secs = self.config.db_timeout.as_secs(),
                    "Database operation timed out"
                );
                Err(ApiError::InternalServer("Database operation timed out".to_string()))
            }
        }
    }
}
