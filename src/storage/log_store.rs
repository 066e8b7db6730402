//! Activity-log persistence.
//!
//! The log is append-only: every user-facing operation and every monitor
//! check writes one entry, and the analytics layers only ever read. Queries
//! are filtered with a `QueryBuilder` and returned most-recent-first.

use chrono::Utc;
use serde_json::Value;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::error_handling::StoreError;
use crate::models::{ActivityLogEntry, LogStatus, NewLogEntry, Severity};

use super::site_store::millis_to_datetime;
use super::SqliteStore;

/// Filters for reading the activity log. All fields are optional and
/// combined with AND.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Restrict to one user.
    pub user_id: Option<String>,
    /// Restrict to one site.
    pub site_id: Option<String>,
    /// Restrict to one log namespace.
    pub entry_type: Option<String>,
    /// Restrict to one action.
    pub action: Option<String>,
    /// Restrict to any of these actions (ignored when empty).
    pub actions: Vec<String>,
    /// Restrict to one outcome status.
    pub status: Option<LogStatus>,
    /// Restrict to one severity.
    pub severity: Option<Severity>,
    /// Entries created at or after this instant.
    pub start: Option<chrono::DateTime<Utc>>,
    /// Entries created at or before this instant.
    pub end: Option<chrono::DateTime<Utc>>,
    /// Maximum entries returned.
    pub limit: Option<u32>,
    /// Entries skipped from the top (for pagination).
    pub offset: Option<u32>,
}

/// Append and read access to the activity log.
#[allow(async_fn_in_trait)]
pub trait LogStore: Send + Sync {
    /// Appends one entry, returning its id.
    async fn append(&self, entry: NewLogEntry) -> Result<String, StoreError>;

    /// Reads entries matching the query, most recent first.
    async fn query(&self, query: &LogQuery) -> Result<Vec<ActivityLogEntry>, StoreError>;

    /// Counts entries matching the query, ignoring limit/offset.
    async fn count(&self, query: &LogQuery) -> Result<u64, StoreError>;
}

impl LogStore for SqliteStore {
    async fn append(&self, entry: NewLogEntry) -> Result<String, StoreError> {
        let details = entry.details.unwrap_or_else(empty_object);
        let metadata = entry.metadata.unwrap_or_else(empty_object);

        let result = sqlx::query(
            "INSERT INTO activity_logs
                (type, action, message, user_id, site_id, site_name, status, severity,
                 details, metadata, duration_ms, ip, tags, created_at_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.entry_type)
        .bind(&entry.action)
        .bind(&entry.message)
        .bind(&entry.user_id)
        .bind(&entry.site_id)
        .bind(&entry.site_name)
        .bind(entry.status.unwrap_or(LogStatus::Info).as_str())
        .bind(entry.severity.unwrap_or(Severity::Low).as_str())
        .bind(serde_json::to_string(&details)?)
        .bind(serde_json::to_string(&metadata)?)
        .bind(entry.duration_ms.map(|d| d as i64))
        .bind(&entry.ip)
        .bind(serde_json::to_string(&entry.tags)?)
        .bind(Utc::now().timestamp_millis())
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid().to_string())
    }

    async fn query(&self, query: &LogQuery) -> Result<Vec<ActivityLogEntry>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM activity_logs");
        push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at_ms DESC, id DESC");
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
            if let Some(offset) = query.offset {
                builder.push(" OFFSET ").push_bind(i64::from(offset));
            }
        }

        let rows = builder.build().fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    async fn count(&self, query: &LogQuery) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM activity_logs");
        push_filters(&mut builder, query);
        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;
        Ok(count as u64)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &LogQuery) {
    let mut has_where = false;

    if let Some(user_id) = &query.user_id {
        connective(builder, &mut has_where);
        builder.push("user_id = ").push_bind(user_id.clone());
    }
    if let Some(site_id) = &query.site_id {
        connective(builder, &mut has_where);
        builder.push("site_id = ").push_bind(site_id.clone());
    }
    if let Some(entry_type) = &query.entry_type {
        connective(builder, &mut has_where);
        builder.push("type = ").push_bind(entry_type.clone());
    }
    if let Some(action) = &query.action {
        connective(builder, &mut has_where);
        builder.push("action = ").push_bind(action.clone());
    }
    if !query.actions.is_empty() {
        connective(builder, &mut has_where);
        builder.push("action IN (");
        {
            let mut separated = builder.separated(", ");
            for action in &query.actions {
                separated.push_bind(action.clone());
            }
        }
        builder.push(")");
    }
    if let Some(status) = query.status {
        connective(builder, &mut has_where);
        builder.push("status = ").push_bind(status.as_str());
    }
    if let Some(severity) = query.severity {
        connective(builder, &mut has_where);
        builder.push("severity = ").push_bind(severity.as_str());
    }
    if let Some(start) = query.start {
        connective(builder, &mut has_where);
        builder
            .push("created_at_ms >= ")
            .push_bind(start.timestamp_millis());
    }
    if let Some(end) = query.end {
        connective(builder, &mut has_where);
        builder
            .push("created_at_ms <= ")
            .push_bind(end.timestamp_millis());
    }
}

fn connective(builder: &mut QueryBuilder<'_, Sqlite>, has_where: &mut bool) {
    if *has_where {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_where = true;
    }
}

fn entry_from_row(row: sqlx::sqlite::SqliteRow) -> ActivityLogEntry {
    let details: String = row.get("details");
    let metadata: String = row.get("metadata");
    let tags: String = row.get("tags");
    let status: String = row.get("status");
    let severity: String = row.get("severity");

    ActivityLogEntry {
        id: row.get::<i64, _>("id").to_string(),
        entry_type: row.get("type"),
        action: row.get("action"),
        message: row.get("message"),
        user_id: row.get("user_id"),
        site_id: row.get("site_id"),
        site_name: row.get("site_name"),
        status: LogStatus::parse(&status),
        severity: Severity::parse(&severity),
        details: serde_json::from_str(&details).unwrap_or_else(|_| empty_object()),
        metadata: serde_json::from_str(&metadata).unwrap_or_else(|_| empty_object()),
        duration_ms: row.get::<Option<i64>, _>("duration_ms").map(|d| d as u64),
        ip: row.get("ip"),
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        created_at: millis_to_datetime(row.get("created_at_ms")),
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
