//! Configuration constants.
//!
//! All operational parameters used throughout the crate: network timeouts,
//! analysis thresholds, and pagination defaults.

use std::time::Duration;

/// Timeout for the basic availability check.
pub const BASIC_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for checks that need the page body (keywords, performance).
pub const CONTENT_CHECK_TIMEOUT: Duration = Duration::from_secs(15);
/// TCP connection timeout in seconds for TLS inspection.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds.
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

/// Fixed User-Agent sent with every probe.
pub const USER_AGENT: &str = concat!("sitesentry-monitor/", env!("CARGO_PKG_VERSION"));

/// Maximum response body captured for analysis (2MB).
/// Larger bodies are truncated to prevent memory exhaustion on hostile pages.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Response-time threshold used for basic-check severity when a site has
/// no explicit alert threshold configured.
pub const DEFAULT_ALERT_THRESHOLD_MS: u64 = 1000;

// Content analysis thresholds
/// Load time above which a slow-loading issue is raised (ms).
pub const SLOW_LOAD_THRESHOLD_MS: u64 = 2000;
/// Load time above which slow-loading escalates to high severity (ms).
pub const VERY_SLOW_LOAD_THRESHOLD_MS: u64 = 5000;
/// Script count above which a many-scripts issue is raised.
pub const MANY_SCRIPTS_THRESHOLD: usize = 15;
/// Page size above which a large-page issue is raised (KB).
pub const LARGE_PAGE_THRESHOLD_KB: u64 = 1500;
/// Page size above which large-page escalates to high severity (KB).
pub const VERY_LARGE_PAGE_THRESHOLD_KB: u64 = 3000;
/// Non-lazy image count above which a missing-lazy-loading issue is raised.
pub const MISSING_LAZY_THRESHOLD: usize = 3;
/// Pixel dimension above which an image counts as oversized.
pub const LARGE_IMAGE_DIMENSION_PX: u32 = 1200;

// Certificate expiry classification
/// Days remaining below which expiry severity is high.
pub const SSL_EXPIRY_CRITICAL_DAYS: i64 = 7;
/// Days remaining below which expiry severity is medium (and a hotspot is raised).
pub const SSL_EXPIRY_WARN_DAYS: i64 = 30;

// Log analytics
/// Error-rate percentage above which a high-error-rate anomaly is raised.
pub const HIGH_ERROR_RATE_THRESHOLD: f64 = 20.0;
/// Error-signature repetition count at which a repeated-error anomaly is raised.
pub const REPEATED_ERROR_MIN_COUNT: usize = 3;
/// Duration above which an operation counts as slow (ms).
pub const SLOW_OPERATION_THRESHOLD_MS: u64 = 2000;
/// Sample operations included in a slow-operations anomaly.
pub const SLOW_OPERATION_SAMPLES: usize = 5;
/// Actions/sites listed in a log summary.
pub const SUMMARY_TOP_N: usize = 5;

/// Default page size for log queries.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Hard cap on page size for log queries.
pub const MAX_PAGE_LIMIT: u32 = 500;
/// Default entry limit for history queries.
pub const HISTORY_DEFAULT_LIMIT: u32 = 100;

/// Concurrent per-site history lookups in the fleet overview.
pub const OVERVIEW_CONCURRENCY: usize = 8;

/// Default SQLite database path.
pub const DB_PATH: &str = "./sitesentry.db";
