//! Persistence layer.
//!
//! The core talks to storage through the [`SiteStore`] and [`LogStore`]
//! traits; [`SqliteStore`] implements both over a shared `sqlx` pool. All
//! log writes are appends and all site writes touch a single row, so no
//! transactions are needed.

pub mod log_store;
pub mod migrations;
pub mod pool;
pub mod site_store;

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

// Re-export commonly used items
pub use log_store::{LogQuery, LogStore};
pub use migrations::run_migrations;
pub use pool::{init_db_pool, init_memory_pool};
pub use site_store::SiteStore;

/// SQLite-backed implementation of both store traits.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    /// Wraps an initialized pool. Callers run [`run_migrations`] first.
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
