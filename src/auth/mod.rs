//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Google OAuth login redirect and callback
//! - Session token issuance and verification
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod oauth_state;
pub mod routes;
pub mod session;
pub mod token;


pub use oauth_state::OAuthStateSigner;
pub use routes::auth_routes;
pub use token::{TokenCodec, TokenError};
