//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /google/login` - Redirect to Google's consent screen
/// - `GET /google/callback` - OAuth callback, returns a session token
/// - `GET /me` - Profile of the bearer token's owner
pub fn auth_routes() -> Router {
    Router::new()
        .route("/google/login", get(handlers::google_login))
        .route("/google/callback", get(handlers::google_callback))
        .route("/me", get(handlers::me_handler))
}
