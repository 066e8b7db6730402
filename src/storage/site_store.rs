//! Site persistence.
//!
//! The monitoring core reads sites and writes only their metrics cache;
//! everything else about a site belongs to the CRUD collaborator. The
//! inherent `insert_site` exists for the CLI and tests to seed records.

use chrono::{DateTime, Utc};
use log::debug;
use sqlx::Row;

use crate::error_handling::StoreError;
use crate::models::{MonitorSettings, Site, SiteMetrics};

use super::SqliteStore;

/// Read/metrics-write access to site records.
#[allow(async_fn_in_trait)]
pub trait SiteStore: Send + Sync {
    /// Loads a site by id.
    async fn get(&self, site_id: &str) -> Result<Option<Site>, StoreError>;

    /// Writes the metrics cache after a basic check.
    async fn update_metrics(
        &self,
        site_id: &str,
        metrics: &SiteMetrics,
    ) -> Result<(), StoreError>;

    /// Loads every site, for the fleet overview.
    async fn list_all(&self) -> Result<Vec<Site>, StoreError>;
}

impl SiteStore for SqliteStore {
    async fn get(&self, site_id: &str) -> Result<Option<Site>, StoreError> {
        let row = sqlx::query("SELECT * FROM sites WHERE id = ?")
            .bind(site_id)
            .fetch_optional(self.pool())
            .await?;
        row.map(site_from_row).transpose()
    }

    async fn update_metrics(
        &self,
        site_id: &str,
        metrics: &SiteMetrics,
    ) -> Result<(), StoreError> {
        debug!("Updating metrics cache for site {site_id}");
        sqlx::query(
            "UPDATE sites
             SET last_status_code = ?, last_available = ?, last_response_time_ms = ?,
                 last_checked_at_ms = ?, updated_at_ms = ?
             WHERE id = ?",
        )
        .bind(metrics.status_code.map(i64::from))
        .bind(metrics.available)
        .bind(metrics.response_time_ms as i64)
        .bind(metrics.checked_at.timestamp_millis())
        .bind(Utc::now().timestamp_millis())
        .bind(site_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Site>, StoreError> {
        let rows = sqlx::query("SELECT * FROM sites ORDER BY created_at_ms")
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(site_from_row).collect()
    }
}

impl SqliteStore {
    /// Inserts or replaces a site record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub async fn insert_site(&self, site: &Site) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO sites
                (id, name, url, owner_user_id, status, ssl_check_enabled, keywords,
                 check_performance, alert_threshold_ms, created_at_ms, updated_at_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&site.id)
        .bind(&site.name)
        .bind(&site.url)
        .bind(&site.owner_user_id)
        .bind(&site.status)
        .bind(site.ssl_check_enabled)
        .bind(serde_json::to_string(&site.keywords)?)
        .bind(site.monitor_settings.check_performance)
        .bind(site.monitor_settings.alert_threshold_ms as i64)
        .bind(site.created_at.timestamp_millis())
        .bind(site.updated_at.timestamp_millis())
        .execute(self.pool())
        .await?;
        Ok(())
    }
}

fn site_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Site, StoreError> {
    let keywords_json: String = row.get("keywords");
    let keywords: Vec<String> = serde_json::from_str(&keywords_json)?;

    Ok(Site {
        id: row.get("id"),
        name: row.get("name"),
        url: row.get("url"),
        owner_user_id: row.get("owner_user_id"),
        status: row.get("status"),
        ssl_check_enabled: row.get::<i64, _>("ssl_check_enabled") != 0,
        keywords,
        monitor_settings: MonitorSettings {
            check_performance: row.get::<i64, _>("check_performance") != 0,
            alert_threshold_ms: row.get::<i64, _>("alert_threshold_ms") as u64,
        },
        created_at: millis_to_datetime(row.get("created_at_ms")),
        updated_at: millis_to_datetime(row.get("updated_at_ms")),
    })
}

pub(crate) fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}
