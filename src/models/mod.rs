//! Core data model: sites, activity-log entries, and the closed enums used
//! across the checking and analytics pipeline.
//!
//! Severity, status, action, and category values are deliberately closed
//! enums rather than free-form strings so the scorer and hotspot classifier
//! match exhaustively; adding a category is a compile-time decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::EnumIter;

/// Ordinal severity attached to log entries, hotspots, and anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action needed.
    Low,
    /// Worth attention on the next pass.
    Medium,
    /// Needs action soon.
    High,
    /// Service-impacting.
    Critical,
}

impl Severity {
    /// Stable string form used in persisted log rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Sort weight for hotspot ranking (higher sorts first).
    pub fn weight(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    /// Parses the persisted string form; unknown values map to `Low`.
    pub fn parse(s: &str) -> Severity {
        match s {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// Outcome status of a logged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    /// The operation completed as intended.
    Success,
    /// The operation failed.
    Error,
    /// Completed with caveats.
    Warning,
    /// Informational entry.
    Info,
}

impl LogStatus {
    /// Stable string form used in persisted log rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Error => "error",
            LogStatus::Warning => "warning",
            LogStatus::Info => "info",
        }
    }

    /// Parses the persisted string form; unknown values map to `Info`.
    pub fn parse(s: &str) -> LogStatus {
        match s {
            "success" => LogStatus::Success,
            "error" => LogStatus::Error,
            "warning" => LogStatus::Warning,
            _ => LogStatus::Info,
        }
    }
}

/// The monitor actions a check emits into the activity log.
///
/// These string forms are part of the persisted history format; the history
/// aggregator and fleet overview group entries by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
pub enum CheckAction {
    /// Basic availability check.
    #[serde(rename = "check")]
    Check,
    /// TLS certificate inspection.
    #[serde(rename = "ssl-check")]
    SslCheck,
    /// Keyword presence scan.
    #[serde(rename = "keyword-check")]
    KeywordCheck,
    /// Page performance analysis.
    #[serde(rename = "performance")]
    Performance,
    /// Hotspot issue analysis.
    #[serde(rename = "hotspots")]
    Hotspots,
    /// Composite full check.
    #[serde(rename = "complete-check")]
    CompleteCheck,
}

impl CheckAction {
    /// Stable string form used as the log entry `action`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckAction::Check => "check",
            CheckAction::SslCheck => "ssl-check",
            CheckAction::KeywordCheck => "keyword-check",
            CheckAction::Performance => "performance",
            CheckAction::Hotspots => "hotspots",
            CheckAction::CompleteCheck => "complete-check",
        }
    }
}

/// Issue category a hotspot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// Load time, page weight, resource counts.
    Performance,
    /// TLS and certificate problems.
    Security,
    /// Missing alt text and similar.
    Accessibility,
    /// Search-engine visibility.
    Seo,
}

/// The specific issue types the analyzers can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter)]
pub enum IssueKind {
    /// Elevated page load time.
    #[serde(rename = "slow-loading")]
    SlowLoading,
    /// Excessive script count.
    #[serde(rename = "many-scripts")]
    ManyScripts,
    /// Page body too large.
    #[serde(rename = "large-page")]
    LargePage,
    /// Images missing `loading="lazy"`.
    #[serde(rename = "missing-lazy-loading")]
    MissingLazyLoading,
    /// Certificate invalid or unobtainable.
    #[serde(rename = "invalid-ssl")]
    InvalidSsl,
    /// Certificate close to expiry.
    #[serde(rename = "expiring-ssl")]
    ExpiringSsl,
    /// Images with excessive pixel dimensions.
    #[serde(rename = "large-images")]
    LargeImages,
    /// Images without alt text.
    #[serde(rename = "missing-alt")]
    MissingAlt,
}

impl IssueKind {
    /// Stable string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SlowLoading => "slow-loading",
            IssueKind::ManyScripts => "many-scripts",
            IssueKind::LargePage => "large-page",
            IssueKind::MissingLazyLoading => "missing-lazy-loading",
            IssueKind::InvalidSsl => "invalid-ssl",
            IssueKind::ExpiringSsl => "expiring-ssl",
            IssueKind::LargeImages => "large-images",
            IssueKind::MissingAlt => "missing-alt",
        }
    }

    /// The category this issue reports under.
    pub fn category(&self) -> IssueCategory {
        match self {
            IssueKind::SlowLoading
            | IssueKind::ManyScripts
            | IssueKind::LargePage
            | IssueKind::MissingLazyLoading
            | IssueKind::LargeImages => IssueCategory::Performance,
            IssueKind::InvalidSsl | IssueKind::ExpiringSsl => IssueCategory::Security,
            IssueKind::MissingAlt => IssueCategory::Accessibility,
        }
    }

    /// The fixed remediation advice attached to hotspots of this kind.
    pub fn recommendation(&self) -> &'static str {
        match self {
            IssueKind::SlowLoading => {
                "Optimize resources, enable compression and caching, consider a CDN"
            }
            IssueKind::ManyScripts => {
                "Combine and minify scripts, load them async or deferred"
            }
            IssueKind::LargePage => {
                "Optimize images, minify CSS/JS, remove unused resources"
            }
            IssueKind::MissingLazyLoading => {
                "Add loading=\"lazy\" to images outside the initial viewport"
            }
            IssueKind::InvalidSsl => "Obtain and install a valid SSL certificate",
            IssueKind::ExpiringSsl => "Renew the SSL certificate before it expires",
            IssueKind::LargeImages => {
                "Resize images to their rendered size and serve responsive variants"
            }
            IssueKind::MissingAlt => "Add descriptive alt attributes to all images",
        }
    }
}

/// Overall health verdict for a site, derived from its hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// No issues found.
    Healthy,
    /// Minor issues only.
    Good,
    /// Accumulating issues.
    Warning,
    /// High-severity issues present.
    Critical,
}

impl HealthStatus {
    /// Human label persisted with full-check results.
    ///
    /// The fleet overview classifies sites by matching these exact strings,
    /// so they are part of the stored history format.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy | HealthStatus::Good => "Bueno",
            HealthStatus::Warning => "Regular",
            HealthStatus::Critical => "Deficiente",
        }
    }
}

/// Per-site monitoring options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSettings {
    /// Whether performance (and therefore hotspot) analysis runs.
    pub check_performance: bool,
    /// Response-time threshold in milliseconds driving basic-check severity.
    pub alert_threshold_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            check_performance: true,
            alert_threshold_ms: crate::config::DEFAULT_ALERT_THRESHOLD_MS,
        }
    }
}

/// A monitored site.
///
/// Owned by exactly one user. The monitoring core reads it and writes only
/// the metrics cache (via `SiteStore::update_metrics`); all other mutation
/// belongs to the site-CRUD collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Store identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Target URL probed by checks.
    pub url: String,
    /// Owner; attached to every log entry the monitor emits for this site.
    pub owner_user_id: String,
    /// Lifecycle status (active/paused), managed externally.
    pub status: String,
    /// Whether the TLS inspection step runs.
    pub ssl_check_enabled: bool,
    /// Keywords the content scan looks for; empty list skips the step.
    pub keywords: Vec<String>,
    /// Monitoring options.
    pub monitor_settings: MonitorSettings,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// One immutable activity-log entry.
///
/// Append-only: created by every user-facing operation (including the
/// monitor itself), never mutated, read by the analytics and history layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    /// Store identifier.
    pub id: String,
    /// Log namespace (`monitor`, `site`, `auth`, `system`, ...). Open set:
    /// external callers define their own namespaces.
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Action within the namespace (`check`, `login`, `create`, ...).
    pub action: String,
    /// Human-readable message.
    pub message: String,
    /// The already-verified identity the operation ran as.
    pub user_id: String,
    /// Present only when the entry concerns a site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Site display name snapshot, for summaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    /// Outcome status.
    pub status: LogStatus,
    /// Severity for alerting and sorting.
    pub severity: Severity,
    /// Operation-specific payload.
    pub details: Value,
    /// Free-form metadata.
    pub metadata: Value,
    /// Operation duration in milliseconds, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Client IP, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Caller-defined tags.
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a log entry. `entry_type` and `user_id` are required;
/// creation silently no-ops without them.
#[derive(Debug, Clone, Default)]
pub struct NewLogEntry {
    /// Log namespace; required.
    pub entry_type: String,
    /// Action within the namespace.
    pub action: String,
    /// Human-readable message.
    pub message: String,
    /// Acting user; required.
    pub user_id: String,
    /// Concerned site, if any.
    pub site_id: Option<String>,
    /// Site display name snapshot.
    pub site_name: Option<String>,
    /// Outcome status.
    pub status: Option<LogStatus>,
    /// Severity; defaults to low.
    pub severity: Option<Severity>,
    /// Operation-specific payload.
    pub details: Option<Value>,
    /// Free-form metadata.
    pub metadata: Option<Value>,
    /// Operation duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Client IP.
    pub ip: Option<String>,
    /// Caller-defined tags.
    pub tags: Vec<String>,
}

/// Snapshot written to a site's metrics cache after each basic check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetrics {
    /// Final HTTP status of the check, if the target responded.
    pub status_code: Option<u16>,
    /// Whether the site was reachable.
    pub available: bool,
    /// Measured response time in milliseconds.
    pub response_time_ms: u64,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn severity_weight_ordering() {
        assert!(Severity::Critical.weight() > Severity::High.weight());
        assert!(Severity::High.weight() > Severity::Medium.weight());
        assert!(Severity::Medium.weight() > Severity::Low.weight());
    }

    #[test]
    fn severity_string_round_trip() {
        for sev in Severity::iter() {
            assert_eq!(Severity::parse(sev.as_str()), sev);
        }
        // Unknown values degrade to low rather than failing.
        assert_eq!(Severity::parse("unheard-of"), Severity::Low);
    }

    #[test]
    fn log_status_string_round_trip() {
        for status in LogStatus::iter() {
            assert_eq!(LogStatus::parse(status.as_str()), status);
        }
        assert_eq!(LogStatus::parse(""), LogStatus::Info);
    }

    #[test]
    fn check_action_strings_are_kebab_case() {
        assert_eq!(CheckAction::SslCheck.as_str(), "ssl-check");
        assert_eq!(CheckAction::CompleteCheck.as_str(), "complete-check");
        for action in CheckAction::iter() {
            assert!(!action.as_str().is_empty());
        }
    }

    #[test]
    fn issue_kind_categories() {
        assert_eq!(IssueKind::InvalidSsl.category(), IssueCategory::Security);
        assert_eq!(IssueKind::MissingAlt.category(), IssueCategory::Accessibility);
        assert_eq!(IssueKind::SlowLoading.category(), IssueCategory::Performance);
        for kind in IssueKind::iter() {
            assert!(!kind.recommendation().is_empty());
        }
    }

    #[test]
    fn health_labels_match_stored_format() {
        assert_eq!(HealthStatus::Healthy.label(), "Bueno");
        assert_eq!(HealthStatus::Good.label(), "Bueno");
        assert_eq!(HealthStatus::Warning.label(), "Regular");
        assert_eq!(HealthStatus::Critical.label(), "Deficiente");
    }
}
