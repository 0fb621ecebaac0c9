// src/profile/store.rs
//! Queries against the `profiles` table

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::models::{IdentityAssertion, Profile};
use crate::common::safe_email_log;

/// Inserts a profile for a new external identity or refreshes email and name of the
/// existing one, returning the profile id.
///
/// A single `INSERT .. ON CONFLICT .. RETURNING` statement keyed on the unique
/// `google_id`, so concurrent first logins for one identity converge on one row.
pub async fn upsert_profile(
    pool: &SqlitePool,
    assertion: &IdentityAssertion,
) -> Result<String, sqlx::Error> {
    let candidate_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    // excluded.created_at is this attempt's timestamp
    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO profiles (id, google_id, email, name, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(google_id) DO UPDATE SET
            email = excluded.email,
            name = excluded.name,
            updated_at = excluded.created_at
        RETURNING id
        "#,
    )
    .bind(&candidate_id)
    .bind(&assertion.external_id)
    .bind(&assertion.email)
    .bind(&assertion.name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    if id == candidate_id {
        debug!(
            user_id = %id,
            email = %safe_email_log(&assertion.email),
            "Created new profile"
        );
    } else {
        debug!(
            user_id = %id,
            email = %safe_email_log(&assertion.email),
            "Refreshed existing profile"
        );
    }

    Ok(id)
}

pub async fn find_profile_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, google_id, email, name, student_id, college,
               department, major, graduation_status, current_semester,
               created_at, updated_at
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
