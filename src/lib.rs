//! sitesentry library: website monitoring and activity-log analytics.
//!
//! This library probes websites (HTTP availability, TLS certificate expiry,
//! page-performance heuristics, keyword presence, hotspot scoring), records
//! every check in an append-only activity log, and derives history series,
//! fleet-wide overviews, per-user log summaries, and anomaly reports from
//! that log.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sitesentry::initialization::init_crypto_provider;
//! use sitesentry::logs::LogService;
//! use sitesentry::monitor::MonitorService;
//! use sitesentry::storage::{init_db_pool, run_migrations, SqliteStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! init_crypto_provider();
//! let pool = init_db_pool(std::path::Path::new("./sitesentry.db")).await?;
//! run_migrations(&pool).await?;
//! let store = Arc::new(SqliteStore::new(pool));
//!
//! let monitor = MonitorService::new(store.clone(), LogService::new(store.clone()))?;
//! let result = monitor.run_full_check("site-1").await?;
//! println!("{} available: {}", result.site_name, result.basic.available);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! All entry points are async and require a Tokio runtime.

#![warn(missing_docs)]

pub mod config;
pub mod content;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod hotspots;
pub mod initialization;
pub mod logs;
pub mod models;
pub mod monitor;
pub mod performance;
pub mod storage;
pub mod tls;
mod utils;

// Re-export the main service types at the crate root.
pub use error_handling::MonitorError;
pub use logs::{LogFilters, LogService, LogsPage};
pub use monitor::{FullCheckResult, MonitorService};
pub use storage::SqliteStore;
