//! Activity-log analytics service.
//!
//! Creation of log entries (with validation that never breaks the calling
//! operation) and paginated queries that bundle the page with a summary and
//! anomaly report.

mod anomaly;
mod summary;

use std::sync::Arc;

use log::{error, warn};
use serde::Serialize;

use crate::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::error_handling::StoreError;
use crate::models::{ActivityLogEntry, LogStatus, NewLogEntry, Severity};
use crate::storage::{LogQuery, LogStore};

pub use anomaly::{detect_anomalies, Anomaly, AnomalyKind};
pub use summary::{generate_summary, ActionCount, LogsSummary, SeverityDistribution, SiteCount};

/// Filters accepted by the paginated log queries.
#[derive(Debug, Clone, Default)]
pub struct LogFilters {
    /// Restrict to one log namespace.
    pub entry_type: Option<String>,
    /// Restrict to one action.
    pub action: Option<String>,
    /// Restrict to one outcome status.
    pub status: Option<LogStatus>,
    /// Restrict to one severity.
    pub severity: Option<Severity>,
    /// Restrict to one site.
    pub site_id: Option<String>,
    /// Entries created at or after this instant.
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Entries created at or before this instant.
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size (defaults to 50, capped at 500).
    pub limit: Option<u32>,
}

/// Pagination metadata for a log page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Entries matching the filters, across all pages.
    pub total: u64,
    /// Page count at the current limit.
    pub total_pages: u64,
    /// The returned page (1-based).
    pub current_page: u32,
    /// Page size.
    pub limit: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

/// One page of logs with its derived summary and anomalies.
#[derive(Debug, Clone, Serialize)]
pub struct LogsPage {
    /// The entries on this page, most recent first.
    pub logs: Vec<ActivityLogEntry>,
    /// Pagination metadata.
    pub pagination: Pagination,
    /// Page-scoped aggregate view.
    pub summary: LogsSummary,
    /// Page-scoped anomaly report.
    pub anomalies: Vec<Anomaly>,
}

/// Log creation and analytics over a [`LogStore`].
#[derive(Debug, Clone)]
pub struct LogService<L> {
    store: Arc<L>,
}

impl<L: LogStore> LogService<L> {
    /// Wraps a log store.
    pub fn new(store: Arc<L>) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &Arc<L> {
        &self.store
    }

    /// Appends a log entry, returning its id.
    ///
    /// Never propagates failure: an entry missing its required fields
    /// (`entry_type`, `user_id`) or a store write error yields `None` so the
    /// calling operation's main flow is unaffected.
    pub async fn create_log(&self, entry: NewLogEntry) -> Option<String> {
        if entry.entry_type.trim().is_empty() || entry.user_id.trim().is_empty() {
            warn!(
                "Discarding log entry without required fields (type: '{}', user: '{}')",
                entry.entry_type, entry.user_id
            );
            return None;
        }

        match self.store.append(entry).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!("Failed to persist log entry: {e}");
                None
            }
        }
    }

    /// Returns one page of a user's logs with summary and anomalies.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the underlying query fails.
    pub async fn get_user_logs(
        &self,
        user_id: &str,
        filters: &LogFilters,
    ) -> Result<LogsPage, StoreError> {
        self.fetch_page(Some(user_id), filters).await
    }

    /// Returns one page across all users (admin view).
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the underlying query fails.
    pub async fn get_all_logs(&self, filters: &LogFilters) -> Result<LogsPage, StoreError> {
        self.fetch_page(None, filters).await
    }

    async fn fetch_page(
        &self,
        user_id: Option<&str>,
        filters: &LogFilters,
    ) -> Result<LogsPage, StoreError> {
        let limit = filters
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let page = filters.page.unwrap_or(1).max(1);

        let query = LogQuery {
            user_id: user_id.map(str::to_string),
            site_id: filters.site_id.clone(),
            entry_type: filters.entry_type.clone(),
            action: filters.action.clone(),
            actions: Vec::new(),
            status: filters.status,
            severity: filters.severity,
            start: filters.start_date,
            end: filters.end_date,
            limit: Some(limit),
            offset: Some((page - 1) * limit),
        };

        let logs = self.store.query(&query).await?;
        let total = self.store.count(&query).await?;

        let total_pages = total.div_ceil(u64::from(limit));
        let pagination = Pagination {
            total,
            total_pages,
            current_page: page,
            limit,
            has_next_page: u64::from(page) < total_pages,
            has_prev_page: page > 1,
        };

        // Summary and anomalies are computed over this page only; see the
        // module docs in `summary` for the rationale.
        let summary = generate_summary(&logs);
        let anomalies = detect_anomalies(&logs);

        Ok(LogsPage {
            logs,
            pagination,
            summary,
            anomalies,
        })
    }
}
