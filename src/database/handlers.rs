//! Database health handlers

use axum::extract::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::common::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct DbCheckResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub result: i64,
}

/// GET /check-db
///
/// # Response
/// ```json
/// {
///   "status": "success",
///   "message": "Database connection successful",
///   "result": 1
/// }
/// ```
pub async fn check_db_connection(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<DbCheckResponse>, ApiError> {
    let pool = state.db()?;

    let value: i64 = state
        .run_db(
            "check_db",
            sqlx::query_scalar("SELECT 1").fetch_one(pool),
        )
        .await
        .map_err(|e| match e {
            ApiError::DatabaseError(err) => {
                error!(error = %err, "Database connection check failed");
                ApiError::InternalServer("Database connection failed".to_string())
            }
            other => other,
        })?;

    debug!(result = value, "Database connection check succeeded");

    Ok(Json(DbCheckResponse {
        status: "success",
        message: "Database connection successful",
        result: value,
    }))
}
