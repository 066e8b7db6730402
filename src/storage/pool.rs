//! Database connection pool management.
//!
//! Initializes the SQLite connection pool with WAL mode enabled for
//! concurrent access, creating the database file when needed.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::sync::Arc;

use log::{error, info};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::error_handling::StoreError;

/// Initializes a connection pool against a database file, creating the file
/// if it does not exist and enabling WAL mode.
///
/// # Errors
///
/// Returns a [`StoreError`] if the file cannot be created or the connection
/// fails.
pub async fn init_db_pool(db_path: &std::path::Path) -> Result<Arc<Pool<Sqlite>>, StoreError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(StoreError::Sql(sqlx::Error::Io(e)));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{db_path_str}")).await?;

    // Enable WAL mode
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

    Ok(Arc::new(pool))
}

/// Initializes an in-memory pool.
///
/// Pinned to a single connection: each in-memory SQLite connection is its
/// own database, so a larger pool would scatter tables across connections.
///
/// # Errors
///
/// Returns a [`StoreError`] if the connection fails.
pub async fn init_memory_pool() -> Result<Arc<Pool<Sqlite>>, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    Ok(Arc::new(pool))
}
