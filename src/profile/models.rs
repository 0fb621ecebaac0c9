// src/profile/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub student_id: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    pub graduation_status: Option<String>,
    pub current_semester: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Claims received from the identity provider after a successful code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    pub external_id: String,
    pub email: String,
    pub name: String,
}

impl IdentityAssertion {
    pub fn new(
        external_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}
