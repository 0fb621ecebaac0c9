//! Database routes

use axum::{routing::get, Router};

use super::handlers;

/// # Routes
/// - `GET /check-db` - Round-trip `SELECT 1` against the pool
pub fn database_routes() -> Router {
    Router::new().route("/check-db", get(handlers::check_db_connection))
}
