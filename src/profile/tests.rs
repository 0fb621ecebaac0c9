//! Tests for profile module
//!
//! These tests verify the profile store against an in-memory database:
//! - Insert of a first-time identity
//! - Email/name refresh for a known identity
//! - Idempotent and concurrent upserts
//! - Assertion validation

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::{remove_file_test_db, setup_file_test_db, setup_test_db};
    use crate::common::Validator;
    use sqlx::SqlitePool;
    use std::sync::Arc;
    use tokio::sync::Barrier;

    async fn count_profiles(pool: &SqlitePool, google_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE google_id = ?")
            .bind(google_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    // ============================================================================
    // Store Tests
    // ============================================================================

    #[tokio::test]
    async fn test_upsert_creates_profile_for_new_identity() {
        let pool = setup_test_db().await;
        let assertion = IdentityAssertion::new("g-123", "a@x.com", "Alice");

        let id = upsert_profile(&pool, &assertion).await.unwrap();

        assert!(uuid::Uuid::parse_str(&id).is_ok(), "id should be a UUID");
        assert_eq!(count_profiles(&pool, "g-123").await, 1);

        let profile = find_profile_by_id(&pool, &id).await.unwrap().unwrap();
        assert_eq!(profile.id, id);
        assert_eq!(profile.google_id, "g-123");
        assert_eq!(profile.email, "a@x.com");
        assert_eq!(profile.name, "Alice");
        assert!(profile.created_at.is_some());
        assert!(profile.updated_at.is_none());
        assert!(profile.student_id.is_none());
        assert!(profile.college.is_none());
        assert!(profile.department.is_none());
        assert!(profile.major.is_none());
        assert!(profile.graduation_status.is_none());
        assert!(profile.current_semester.is_none());
    }

    #[tokio::test]
    async fn test_upsert_refreshes_existing_identity() {
        let pool = setup_test_db().await;

        let first = upsert_profile(&pool, &IdentityAssertion::new("g-123", "a@x.com", "Alice"))
            .await
            .unwrap();
        let created_at = find_profile_by_id(&pool, &first)
            .await
            .unwrap()
            .unwrap()
            .created_at;

        let second = upsert_profile(
            &pool,
            &IdentityAssertion::new("g-123", "a2@x.com", "Alice B"),
        )
        .await
        .unwrap();

        assert_eq!(first, second, "known identity must keep its id");
        assert_eq!(count_profiles(&pool, "g-123").await, 1);

        let profile = find_profile_by_id(&pool, &second).await.unwrap().unwrap();
        assert_eq!(profile.email, "a2@x.com");
        assert_eq!(profile.name, "Alice B");
        assert_eq!(profile.created_at, created_at);
        assert!(profile.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let pool = setup_test_db().await;
        let assertion = IdentityAssertion::new("g-777", "same@x.com", "Same");

        let first = upsert_profile(&pool, &assertion).await.unwrap();
        let second = upsert_profile(&pool, &assertion).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(count_profiles(&pool, "g-777").await, 1);
    }

    #[tokio::test]
    async fn test_upsert_keeps_identities_apart() {
        let pool = setup_test_db().await;

        let alice = upsert_profile(&pool, &IdentityAssertion::new("g-1", "a@x.com", "Alice"))
            .await
            .unwrap();
        let bob = upsert_profile(&pool, &IdentityAssertion::new("g-2", "b@x.com", "Bob"))
            .await
            .unwrap();

        assert_ne!(alice, bob);
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_logins_create_one_row() {
        const CALLERS: usize = 8;
        let (pool, path) = setup_file_test_db(CALLERS as u32).await;
        let barrier = Arc::new(Barrier::new(CALLERS));

        let mut handles = Vec::new();
        for i in 0..CALLERS {
            let pool = pool.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                let assertion =
                    IdentityAssertion::new("g-race", format!("race{}@x.com", i), "Racer");
                barrier.wait().await;
                upsert_profile(&pool, &assertion).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }

        assert!(ids.windows(2).all(|w| w[0] == w[1]), "all callers see one id");
        assert_eq!(count_profiles(&pool, "g-race").await, 1);

        remove_file_test_db(pool, path).await;
    }

    #[tokio::test]
    async fn test_upsert_allows_empty_name() {
        let pool = setup_test_db().await;

        let id = upsert_profile(&pool, &IdentityAssertion::new("g-anon", "anon@x.com", ""))
            .await
            .unwrap();

        let profile = find_profile_by_id(&pool, &id).await.unwrap().unwrap();
        assert_eq!(profile.name, "");
    }

    #[tokio::test]
    async fn test_find_profile_by_unknown_id() {
        let pool = setup_test_db().await;

        let missing = find_profile_by_id(&pool, "00000000-0000-0000-0000-000000000000")
            .await
            .unwrap();

        assert!(missing.is_none());
    }

    // ============================================================================
    // Validator Tests
    // ============================================================================

    #[test]
    fn test_assertion_validator_accepts_complete_assertion() {
        let result = IdentityAssertionValidator
            .validate(&IdentityAssertion::new("g-123", "a@x.com", ""));

        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_assertion_validator_rejects_missing_subject_and_email() {
        let result = IdentityAssertionValidator.validate(&IdentityAssertion::new("", " ", "Alice"));

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].field, "sub");
        assert_eq!(result.errors[1].field, "email");
    }

    #[test]
    fn test_profile_serializes_missing_timestamps_as_null() {
        let profile = Profile {
            id: "id-1".to_string(),
            google_id: "g-1".to_string(),
            email: "a@x.com".to_string(),
            name: "Alice".to_string(),
            student_id: None,
            college: None,
            department: None,
            major: None,
            graduation_status: None,
            current_semester: None,
            created_at: None,
            updated_at: None,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["created_at"].is_null());
        assert!(json["updated_at"].is_null());
        assert!(json["student_id"].is_null());
        assert_eq!(json["google_id"], "g-1");
    }
}
