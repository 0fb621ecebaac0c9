// Shared fixtures for handler tests

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use super::{migrations::run_migrations, AppConfig, AppState};
use crate::services::IdentityProvider;

pub async fn setup_test_db() -> SqlitePool {
    // One connection so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}

/// File-backed database with several pooled connections, so concurrent writers
/// really contend. The caller removes the returned path when done.
pub async fn setup_file_test_db(max_connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("profile_auth_{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .min_connections(max_connections)
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    (pool, path)
}

pub async fn remove_file_test_db(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = tokio::fs::remove_file(file).await;
    }
}

pub fn test_state(
    db: Option<SqlitePool>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
) -> Arc<AppState> {
    Arc::new(AppState::new(AppConfig::for_tests(), db, identity_provider))
}

/// Sends one request through the router, returning status, headers and JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
