//! Schema management.
//!
//! The schema is small enough to own inline: two tables (sites and the
//! append-only activity log) plus the indexes the analytics queries lean on.
//! Statements are idempotent so startup can always run them.

use sqlx::{Pool, Sqlite};

use crate::error_handling::StoreError;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sites (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        url TEXT NOT NULL,
        owner_user_id TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        ssl_check_enabled INTEGER NOT NULL DEFAULT 1,
        keywords TEXT NOT NULL DEFAULT '[]',
        check_performance INTEGER NOT NULL DEFAULT 1,
        alert_threshold_ms INTEGER NOT NULL DEFAULT 1000,
        last_status_code INTEGER,
        last_available INTEGER,
        last_response_time_ms INTEGER,
        last_checked_at_ms INTEGER,
        created_at_ms INTEGER NOT NULL,
        updated_at_ms INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS activity_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        action TEXT NOT NULL,
        message TEXT NOT NULL,
        user_id TEXT NOT NULL,
        site_id TEXT,
        site_name TEXT,
        status TEXT NOT NULL,
        severity TEXT NOT NULL,
        details TEXT NOT NULL DEFAULT '{}',
        metadata TEXT NOT NULL DEFAULT '{}',
        duration_ms INTEGER,
        ip TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        created_at_ms INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_logs_user_created
        ON activity_logs(user_id, created_at_ms)",
    "CREATE INDEX IF NOT EXISTS idx_logs_site_type_created
        ON activity_logs(site_id, type, created_at_ms)",
];

/// Creates tables and indexes if they do not exist.
///
/// # Errors
///
/// Returns a [`StoreError`] if any DDL statement fails.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::pool::init_memory_pool;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = init_memory_pool().await.expect("pool");
        run_migrations(&pool).await.expect("first run");
        run_migrations(&pool).await.expect("second run");

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
                .fetch_one(pool.as_ref())
                .await
                .expect("table exists");
        assert_eq!(count, 0);
    }
}
