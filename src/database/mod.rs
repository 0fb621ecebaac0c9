//! # Database Module
//!
//! Connectivity check against the configured database.

pub mod handlers;
pub mod routes;


pub use routes::database_routes;
