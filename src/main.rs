// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod database;
mod logging_middleware;
mod profile;
mod services;

use common::{AppConfig, AppState};
use services::{GoogleOAuthConfig, GoogleService, IdentityProvider};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    let db = match &config.database_url {
        Some(database_url) => Some(connect_database(database_url, &config).await?),
        None => {
            warn!("DATABASE_URL not set; database-backed endpoints will report a configuration error");
            None
        }
    };

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let identity_provider: Option<Arc<dyn IdentityProvider>> = match config.google_credentials() {
        Some((client_id, client_secret)) => {
            let google = GoogleService::new(
                GoogleOAuthConfig {
                    client_id: client_id.to_string(),
                    client_secret: client_secret.to_string(),
                    redirect_uri: config.oauth_redirect_uri.clone(),
                },
                config.http_timeout,
            );
            info!("GoogleService initialized");
            let provider: Arc<dyn IdentityProvider> = Arc::new(google);
            Some(provider)
        }
        None => {
            warn!("GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET not set; Google login is disabled");
            None
        }
    };

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let port = config.port;
    let shared = Arc::new(AppState::new(config, db, identity_provider));

    let app = build_router(shared);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Opens the pool (baseline connections plus overflow) and applies the schema.
async fn connect_database(database_url: &str, config: &AppConfig) -> anyhow::Result<SqlitePool> {
    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .min_connections(config.db_pool_size)
        .max_connections(config.db_max_connections())
        .acquire_timeout(config.db_timeout)
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;
    info!(
        pool_size = config.db_pool_size,
        max_overflow = config.db_max_overflow,
        "Database pool ready"
    );

    Ok(pool)
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

pub fn build_router(shared: Arc<AppState>) -> Router {
    let origins: Vec<axum::http::HeaderValue> = shared
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true);

    Router::new()
        .merge(auth::auth_routes())
        .merge(database::database_routes())
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
