// src/common/migrations.rs
//! Database schema bootstrap

use sqlx::SqlitePool;
use tracing::info;

/// Creates the schema if it does not exist yet. Existing rows are left alone.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_profile_tables(pool).await?;

    info!("✅ Database schema ready");
    Ok(())
}

async fn create_profile_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // google_id carries the UNIQUE constraint that the login upsert conflicts on
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            google_id TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            student_id TEXT,
            college TEXT,
            department TEXT,
            major TEXT,
            graduation_status TEXT,
            current_semester TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_profiles_email ON profiles(email)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rerunning_migrations_keeps_profiles() {
        let pool = crate::common::test_support::setup_test_db().await;
        sqlx::query(
            "INSERT INTO profiles (id, google_id, email, name, created_at) VALUES ('p-1', 'g-1', 'a@x.com', 'Alice', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
