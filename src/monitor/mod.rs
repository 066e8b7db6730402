//! Check orchestration.
//!
//! The monitor service runs the configured checks for a site in sequence —
//! basic availability, TLS inspection, keyword scan, performance analysis,
//! hotspot analysis — tolerating partial failures: a failed step is recorded
//! in the composite result and its log entry, and never aborts the siblings.
//! Only an unresolvable site id is fatal.
//!
//! Every step emits one `monitor`-typed activity-log entry; the log is the
//! monitoring history that the aggregators in [`history`] and [`overview`]
//! later read.

mod history;
mod overview;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::{BASIC_CHECK_TIMEOUT, CONTENT_CHECK_TIMEOUT, HISTORY_DEFAULT_LIMIT};
use crate::content::{self, ContentMetrics};
use crate::error_handling::MonitorError;
use crate::fetch::Fetcher;
use crate::hotspots::{self, HotspotReport};
use crate::logs::LogService;
use crate::models::{
    CheckAction, LogStatus, NewLogEntry, Severity, Site, SiteMetrics,
};
use crate::performance::{self, PerformanceResult};
use crate::storage::{LogQuery, LogStore, SiteStore};
use crate::tls::{self, SslCheck};

pub use history::{
    AvailabilityPoint, HistoryOptions, HistorySeries, HistorySummary, MonitoringHistory,
    PerformancePoint, Period, ResponseTimePoint, SslPoint,
};
pub use overview::{AdminOverview, HealthBuckets, SiteOverviewEntry};

/// Result of one basic availability probe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicCheck {
    /// When the check ran.
    pub timestamp: DateTime<Utc>,
    /// The probed URL.
    pub url: String,
    /// Whether the final status fell in `[200, 400)`.
    pub available: bool,
    /// Final HTTP status, absent when the target never responded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Measured response time.
    #[serde(rename = "responseTime")]
    pub response_time_ms: u64,
    /// `Content-Type` of the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Response size in bytes.
    pub content_length: u64,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// The fetch failure, when the target was unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one keyword scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCheck {
    /// Occurrences per configured keyword.
    pub matches: BTreeMap<String, usize>,
    /// Sum of all occurrence counts.
    pub total_matches: usize,
    /// Keywords with zero occurrences.
    pub missing_keywords: Vec<String>,
    /// Whether every keyword was found.
    pub all_keywords_present: bool,
    /// Set when the site has no keywords configured and the scan was a no-op.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl KeywordCheck {
    fn from_metrics(metrics: &ContentMetrics) -> Self {
        Self {
            matches: metrics.keyword_matches.clone(),
            total_matches: metrics.total_matches(),
            missing_keywords: metrics.missing_keywords.clone(),
            all_keywords_present: metrics.all_keywords_present(),
            message: None,
        }
    }

    fn not_configured() -> Self {
        Self {
            matches: BTreeMap::new(),
            total_matches: 0,
            missing_keywords: Vec::new(),
            all_keywords_present: true,
            message: Some("No keywords configured for this site".to_string()),
        }
    }
}

/// Outcome of one step inside a composite check.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StepOutcome<T> {
    /// The step ran and produced a result.
    Completed(T),
    /// The step was not applicable for this site.
    Skipped {
        /// Always `true`.
        skipped: bool,
    },
    /// The step ran and failed; the failure is data, not an exception.
    Failed {
        /// The failure description.
        error: String,
    },
}

impl<T> StepOutcome<T> {
    /// The skipped marker.
    pub fn skipped() -> Self {
        StepOutcome::Skipped { skipped: true }
    }

    /// A failure payload from any error.
    pub fn failed(error: impl ToString) -> Self {
        StepOutcome::Failed {
            error: error.to_string(),
        }
    }

    /// The completed value, when present.
    pub fn completed(&self) -> Option<&T> {
        match self {
            StepOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the step was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped { .. })
    }
}

/// Composite result of a full check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullCheckResult {
    /// When the check ran.
    pub timestamp: DateTime<Utc>,
    /// Checked site id.
    pub site_id: String,
    /// Checked site name.
    pub site_name: String,
    /// Checked URL.
    pub url: String,
    /// Availability probe; always runs, unreachable targets are recorded as
    /// unavailable rather than failed.
    pub basic: BasicCheck,
    /// TLS inspection step.
    pub ssl: StepOutcome<SslCheck>,
    /// Keyword scan step.
    pub keywords: StepOutcome<KeywordCheck>,
    /// Performance analysis step.
    pub performance: StepOutcome<PerformanceResult>,
    /// Hotspot analysis; requires the performance step.
    pub hotspots: StepOutcome<HotspotReport>,
    /// Health label persisted for the fleet overview, when hotspots ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
}

/// Website monitoring over a site store and an activity-log store.
#[derive(Debug, Clone)]
pub struct MonitorService<S, L> {
    sites: Arc<S>,
    logs: LogService<L>,
    fetcher: Fetcher,
}

impl<S: SiteStore, L: LogStore> MonitorService<S, L> {
    /// Builds a monitor over the given stores.
    ///
    /// # Errors
    ///
    /// Returns a `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn new(sites: Arc<S>, logs: LogService<L>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            sites,
            logs,
            fetcher: Fetcher::new()?,
        })
    }

    /// The log service this monitor writes through.
    pub fn logs(&self) -> &LogService<L> {
        &self.logs
    }

    async fn resolve_site(&self, site_id: &str) -> Result<Site, MonitorError> {
        self.sites
            .get(site_id)
            .await?
            .ok_or_else(|| MonitorError::SiteNotFound(site_id.to_string()))
    }

    /// Runs the basic availability check for a site.
    ///
    /// An unreachable target yields an `available: false` result, not an
    /// error; the outcome is logged and the site's metrics cache updated.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SiteNotFound`] if the site does not exist.
    pub async fn run_basic_check(&self, site_id: &str) -> Result<BasicCheck, MonitorError> {
        let site = self.resolve_site(site_id).await?;
        Ok(self.basic_check(&site).await)
    }

    async fn basic_check(&self, site: &Site) -> BasicCheck {
        debug!("Running basic check for site {} ({})", site.name, site.url);

        let result = match self.fetcher.fetch(&site.url, BASIC_CHECK_TIMEOUT).await {
            Ok(outcome) => BasicCheck {
                timestamp: Utc::now(),
                url: site.url.clone(),
                available: outcome.available,
                status_code: Some(outcome.status_code),
                response_time_ms: outcome.response_time_ms,
                content_type: outcome.content_type,
                content_length: outcome.content_length,
                headers: outcome.headers,
                error: None,
            },
            Err(e) => {
                warn!("Basic check could not reach {}: {e}", site.url);
                BasicCheck {
                    timestamp: Utc::now(),
                    url: site.url.clone(),
                    available: false,
                    status_code: None,
                    response_time_ms: 0,
                    content_type: None,
                    content_length: 0,
                    headers: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        // A failed cache write must not fail the check itself.
        let metrics = SiteMetrics {
            status_code: result.status_code,
            available: result.available,
            response_time_ms: result.response_time_ms,
            checked_at: result.timestamp,
        };
        if let Err(e) = self.sites.update_metrics(&site.id, &metrics).await {
            error!("Failed to update metrics cache for site {}: {e}", site.id);
        }

        let severity = basic_severity(
            result.available,
            result.response_time_ms,
            site.monitor_settings.alert_threshold_ms,
        );
        let (status, message) = if result.available {
            (
                LogStatus::Success,
                format!("Monitor check for {}: Success", site.name),
            )
        } else {
            (
                LogStatus::Error,
                format!("Monitor check for {}: Failed", site.name),
            )
        };
        self.emit(
            site,
            CheckAction::Check,
            message,
            status,
            severity,
            json!({
                "responseTime": result.response_time_ms,
                "statusCode": result.status_code,
                "contentType": result.content_type,
                "contentLength": result.content_length,
                "error": result.error,
            }),
            Some(result.response_time_ms),
        )
        .await;

        result
    }

    /// Inspects the site's TLS certificate.
    ///
    /// Non-HTTPS targets and failed handshakes yield an invalid result;
    /// only true reachability failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SiteNotFound`] if the site does not exist, or
    /// [`MonitorError::Tls`] when the host could not be reached at all.
    pub async fn run_ssl_check(&self, site_id: &str) -> Result<SslCheck, MonitorError> {
        let site = self.resolve_site(site_id).await?;
        self.ssl_check(&site).await
    }

    async fn ssl_check(&self, site: &Site) -> Result<SslCheck, MonitorError> {
        if !site.url.starts_with("https://") {
            return Ok(SslCheck::invalid("Site does not use HTTPS"));
        }

        let Some(host) = url::Url::parse(&site.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        else {
            return Ok(SslCheck::invalid("Site URL has no hostname"));
        };

        debug!("Running SSL check for site {} ({host})", site.name);

        let check = match tls::inspect_certificate(&host).await {
            Ok(check) => check,
            Err(e) => {
                self.emit(
                    site,
                    CheckAction::SslCheck,
                    format!("Error SSL check for {}: {e}", site.name),
                    LogStatus::Error,
                    Severity::High,
                    json!({ "error": e.to_string() }),
                    None,
                )
                .await;
                return Err(e.into());
            }
        };

        match &check {
            SslCheck::Valid(info) => {
                self.emit(
                    site,
                    CheckAction::SslCheck,
                    format!(
                        "SSL check for {}: {} days remaining",
                        site.name, info.days_remaining
                    ),
                    LogStatus::Success,
                    tls::expiry_severity(info.days_remaining),
                    to_details(&check),
                    None,
                )
                .await;
            }
            SslCheck::Invalid { message, .. } => {
                self.emit(
                    site,
                    CheckAction::SslCheck,
                    format!("SSL check for {}: {message}", site.name),
                    LogStatus::Warning,
                    Severity::High,
                    to_details(&check),
                    None,
                )
                .await;
            }
        }

        Ok(check)
    }

    /// Scans the site's page for its configured keywords.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SiteNotFound`] if the site does not exist, or
    /// [`MonitorError::Fetch`] when the page could not be fetched.
    pub async fn run_keyword_check(&self, site_id: &str) -> Result<KeywordCheck, MonitorError> {
        let site = self.resolve_site(site_id).await?;
        if site.keywords.is_empty() {
            return Ok(KeywordCheck::not_configured());
        }

        let outcome = match self.fetcher.fetch(&site.url, CONTENT_CHECK_TIMEOUT).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.emit_fetch_failure(&site, CheckAction::KeywordCheck, &e)
                    .await;
                return Err(e.into());
            }
        };

        let metrics = content::analyze(&outcome.body, &site.keywords);
        let result = KeywordCheck::from_metrics(&metrics);
        self.log_keyword_result(&site, &result).await;
        Ok(result)
    }

    async fn log_keyword_result(&self, site: &Site, result: &KeywordCheck) {
        let (status, severity, message) = if result.all_keywords_present {
            (
                LogStatus::Success,
                Severity::Low,
                format!("Keyword check for {}: All present", site.name),
            )
        } else {
            (
                LogStatus::Warning,
                Severity::Medium,
                format!(
                    "Keyword check for {}: Missing {}",
                    site.name,
                    result.missing_keywords.len()
                ),
            )
        };
        self.emit(
            site,
            CheckAction::KeywordCheck,
            message,
            status,
            severity,
            to_details(result),
            None,
        )
        .await;
    }

    /// Analyzes the site's page performance.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SiteNotFound`] if the site does not exist, or
    /// [`MonitorError::Fetch`] when the page could not be fetched.
    pub async fn run_performance_check(
        &self,
        site_id: &str,
    ) -> Result<PerformanceResult, MonitorError> {
        let site = self.resolve_site(site_id).await?;
        self.performance_check(&site).await
    }

    async fn performance_check(&self, site: &Site) -> Result<PerformanceResult, MonitorError> {
        let outcome = match self.fetcher.fetch(&site.url, CONTENT_CHECK_TIMEOUT).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.emit_fetch_failure(&site, CheckAction::Performance, &e)
                    .await;
                return Err(e.into());
            }
        };

        let metrics = content::analyze(&outcome.body, &[]);
        let result = performance::analyze(
            outcome.response_time_ms,
            page_size_kb(outcome.body.len()),
            &metrics,
        );
        self.log_performance_result(&site, &result).await;
        Ok(result)
    }

    async fn log_performance_result(&self, site: &Site, result: &PerformanceResult) {
        let status = if result.score > 70 {
            LogStatus::Success
        } else {
            LogStatus::Warning
        };
        let severity = if result.score < 50 {
            Severity::High
        } else if result.score < 70 {
            Severity::Medium
        } else {
            Severity::Low
        };
        self.emit(
            site,
            CheckAction::Performance,
            format!(
                "Performance analysis for {}: Score {}/100",
                site.name, result.score
            ),
            status,
            severity,
            to_details(result),
            Some(result.load_time_ms),
        )
        .await;
    }

    /// Runs performance and TLS analysis, then derives the hotspot report.
    ///
    /// A TLS failure is tolerated — the report is built without certificate
    /// findings — but a failed page fetch is fatal because every other
    /// finding depends on it.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SiteNotFound`] if the site does not exist, or
    /// [`MonitorError::Fetch`] when the page could not be fetched.
    pub async fn run_hotspot_analysis(
        &self,
        site_id: &str,
    ) -> Result<HotspotReport, MonitorError> {
        let site = self.resolve_site(site_id).await?;

        let performance = self.performance_check(&site).await?;
        let ssl = match self.ssl_check(&site).await {
            Ok(check) => Some(check),
            Err(e) => {
                warn!("Skipping SSL findings for {}: {e}", site.name);
                None
            }
        };

        Ok(self
            .hotspot_report(&site, &performance, ssl.as_ref())
            .await)
    }

    async fn hotspot_report(
        &self,
        site: &Site,
        performance: &PerformanceResult,
        ssl: Option<&SslCheck>,
    ) -> HotspotReport {
        let report = hotspots::analyze(site, performance, ssl);

        let status = if report.critical_issues > 0 {
            LogStatus::Warning
        } else {
            LogStatus::Success
        };
        let severity = if report.critical_issues > 0 {
            Severity::High
        } else if report.total_issues > 5 {
            Severity::Medium
        } else {
            Severity::Low
        };
        self.emit(
            site,
            CheckAction::Hotspots,
            format!(
                "Hotspot analysis for {}: {} issues found",
                site.name, report.total_issues
            ),
            status,
            severity,
            json!({
                "totalIssues": report.total_issues,
                "criticalIssues": report.critical_issues,
                "byCategory": serde_json::to_value(&report.by_category).unwrap_or(Value::Null),
                "overallHealth": serde_json::to_value(&report.overall_health).unwrap_or(Value::Null),
            }),
            None,
        )
        .await;

        report
    }

    /// Runs every applicable check for a site and persists the composite
    /// outcome as a `complete-check` log entry.
    ///
    /// Step skip rules: `ssl` needs an HTTPS URL and `ssl_check_enabled`;
    /// `keywords` needs a configured keyword list; `performance` (and with
    /// it `hotspots`) needs `monitor_settings.check_performance`. The page
    /// is fetched once and shared between the keyword and performance steps.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SiteNotFound`] if the site does not exist;
    /// every other failure is captured inside the composite result.
    pub async fn run_full_check(&self, site_id: &str) -> Result<FullCheckResult, MonitorError> {
        let site = self.resolve_site(site_id).await?;
        info!("Starting full check for site {} ({})", site.name, site.url);

        let basic = self.basic_check(&site).await;

        let ssl = if site.ssl_check_enabled && site.url.starts_with("https://") {
            match self.ssl_check(&site).await {
                Ok(check) => StepOutcome::Completed(check),
                Err(e) => StepOutcome::failed(e),
            }
        } else {
            StepOutcome::skipped()
        };

        let wants_keywords = !site.keywords.is_empty();
        let wants_performance = site.monitor_settings.check_performance;

        let (keywords, performance) = if wants_keywords || wants_performance {
            match self.fetcher.fetch(&site.url, CONTENT_CHECK_TIMEOUT).await {
                Ok(outcome) => {
                    let metrics = content::analyze(&outcome.body, &site.keywords);

                    let keywords = if wants_keywords {
                        let result = KeywordCheck::from_metrics(&metrics);
                        self.log_keyword_result(&site, &result).await;
                        StepOutcome::Completed(result)
                    } else {
                        StepOutcome::skipped()
                    };

                    let performance = if wants_performance {
                        let result = performance::analyze(
                            outcome.response_time_ms,
                            page_size_kb(outcome.body.len()),
                            &metrics,
                        );
                        self.log_performance_result(&site, &result).await;
                        StepOutcome::Completed(result)
                    } else {
                        StepOutcome::skipped()
                    };

                    (keywords, performance)
                }
                Err(e) => {
                    let keywords = if wants_keywords {
                        self.emit_fetch_failure(&site, CheckAction::KeywordCheck, &e)
                            .await;
                        StepOutcome::failed(&e)
                    } else {
                        StepOutcome::skipped()
                    };
                    let performance = if wants_performance {
                        self.emit_fetch_failure(&site, CheckAction::Performance, &e)
                            .await;
                        StepOutcome::failed(&e)
                    } else {
                        StepOutcome::skipped()
                    };
                    (keywords, performance)
                }
            }
        } else {
            (StepOutcome::skipped(), StepOutcome::skipped())
        };

        // Hard dependency: hotspot analysis consumes the performance result.
        let hotspots = match performance.completed() {
            Some(perf) => {
                let report = self
                    .hotspot_report(&site, perf, ssl.completed())
                    .await;
                StepOutcome::Completed(report)
            }
            None => StepOutcome::skipped(),
        };

        let health = hotspots
            .completed()
            .map(|report| report.overall_health.status.label().to_string());

        let result = FullCheckResult {
            timestamp: Utc::now(),
            site_id: site.id.clone(),
            site_name: site.name.clone(),
            url: site.url.clone(),
            basic,
            ssl,
            keywords,
            performance,
            hotspots,
            health,
        };

        self.emit(
            &site,
            CheckAction::CompleteCheck,
            format!("Complete check for {}", site.name),
            LogStatus::Success,
            Severity::Low,
            composite_details(&result),
            None,
        )
        .await;

        Ok(result)
    }

    /// Reconstructs time series from the site's monitoring log.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Store`] if the log query fails.
    pub async fn get_history(
        &self,
        site_id: &str,
        options: &HistoryOptions,
    ) -> Result<MonitoringHistory, MonitorError> {
        let query = LogQuery {
            site_id: Some(site_id.to_string()),
            entry_type: Some("monitor".to_string()),
            actions: options.actions.clone(),
            start: options.start_date,
            end: options.end_date,
            limit: Some(options.limit.unwrap_or(HISTORY_DEFAULT_LIMIT)),
            ..Default::default()
        };
        let logs = self.logs.store().query(&query).await.map_err(MonitorError::Store)?;
        Ok(history::build_history(site_id, &logs, options))
    }

    /// Builds the fleet-wide health overview for the given sites.
    ///
    /// Per-site history lookups run on a bounded pool; output order follows
    /// input order and one site's missing or unreadable history never fails
    /// the overview.
    pub async fn get_admin_overview(&self, sites: &[Site]) -> AdminOverview {
        overview::build_overview(self, sites).await
    }

    pub(crate) async fn latest_full_check(
        &self,
        site_id: &str,
    ) -> Result<Option<crate::models::ActivityLogEntry>, MonitorError> {
        let query = LogQuery {
            site_id: Some(site_id.to_string()),
            entry_type: Some("monitor".to_string()),
            action: Some(CheckAction::CompleteCheck.as_str().to_string()),
            limit: Some(1),
            ..Default::default()
        };
        let mut entries = self.logs.store().query(&query).await.map_err(MonitorError::Store)?;
        Ok(if entries.is_empty() {
            None
        } else {
            Some(entries.remove(0))
        })
    }

    async fn emit_fetch_failure(
        &self,
        site: &Site,
        action: CheckAction,
        e: &crate::error_handling::FetchError,
    ) {
        self.emit(
            site,
            action,
            format!("Error running {} for {}: {e}", action.as_str(), site.name),
            LogStatus::Error,
            Severity::Medium,
            json!({ "error": e.to_string() }),
            None,
        )
        .await;
    }

    #[allow(clippy::too_many_arguments)]
    async fn emit(
        &self,
        site: &Site,
        action: CheckAction,
        message: String,
        status: LogStatus,
        severity: Severity,
        details: Value,
        duration_ms: Option<u64>,
    ) {
        self.logs
            .create_log(NewLogEntry {
                entry_type: "monitor".to_string(),
                action: action.as_str().to_string(),
                message,
                user_id: site.owner_user_id.clone(),
                site_id: Some(site.id.clone()),
                site_name: Some(site.name.clone()),
                status: Some(status),
                severity: Some(severity),
                details: Some(details),
                metadata: Some(json!({ "url": site.url })),
                duration_ms,
                ..Default::default()
            })
            .await;
    }
}

/// Severity of a basic check relative to the site's alert threshold.
fn basic_severity(available: bool, response_time_ms: u64, threshold_ms: u64) -> Severity {
    if !available {
        return Severity::High;
    }
    if response_time_ms as f64 > threshold_ms as f64 * 1.5 {
        return Severity::High;
    }
    if response_time_ms > threshold_ms {
        return Severity::Medium;
    }
    Severity::Low
}

fn page_size_kb(bytes: usize) -> u64 {
    (bytes as f64 / 1024.0).round() as u64
}

fn to_details<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Condensed per-step summary stored with the `complete-check` entry. The
/// fleet overview reads `basic.available` and `health` from here.
fn composite_details(result: &FullCheckResult) -> Value {
    let ssl = match &result.ssl {
        StepOutcome::Completed(check) => json!({
            "valid": check.is_valid(),
            "daysRemaining": check.days_remaining(),
        }),
        StepOutcome::Skipped { .. } => json!({ "skipped": true }),
        StepOutcome::Failed { error } => json!({ "error": error }),
    };
    let performance = match &result.performance {
        StepOutcome::Completed(perf) => json!({
            "score": perf.score,
            "loadTime": perf.load_time_ms,
            "issuesCount": perf.issues.len(),
        }),
        StepOutcome::Skipped { .. } => json!({ "skipped": true }),
        StepOutcome::Failed { error } => json!({ "error": error }),
    };
    let hotspots = match &result.hotspots {
        StepOutcome::Completed(report) => json!({
            "totalIssues": report.total_issues,
            "criticalIssues": report.critical_issues,
        }),
        StepOutcome::Skipped { .. } => json!({ "skipped": true }),
        StepOutcome::Failed { error } => json!({ "error": error }),
    };

    json!({
        "basic": {
            "available": result.basic.available,
            "responseTime": result.basic.response_time_ms,
            "statusCode": result.basic.status_code,
        },
        "ssl": ssl,
        "performance": performance,
        "hotspots": hotspots,
        "health": result.health,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_severity_thresholds() {
        assert_eq!(basic_severity(false, 10, 1000), Severity::High);
        assert_eq!(basic_severity(true, 1501, 1000), Severity::High);
        assert_eq!(basic_severity(true, 1500, 1000), Severity::Medium);
        assert_eq!(basic_severity(true, 1001, 1000), Severity::Medium);
        assert_eq!(basic_severity(true, 1000, 1000), Severity::Low);
        assert_eq!(basic_severity(true, 10, 1000), Severity::Low);
    }

    #[test]
    fn page_size_rounds_to_nearest_kb() {
        assert_eq!(page_size_kb(0), 0);
        assert_eq!(page_size_kb(511), 0);
        assert_eq!(page_size_kb(512), 1);
        assert_eq!(page_size_kb(1536), 2);
    }

    #[test]
    fn step_outcome_serialization_shapes() {
        let skipped: StepOutcome<KeywordCheck> = StepOutcome::skipped();
        assert_eq!(serde_json::to_value(&skipped).unwrap(), json!({"skipped": true}));

        let failed: StepOutcome<KeywordCheck> = StepOutcome::failed("boom");
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"error": "boom"}));

        let completed = StepOutcome::Completed(KeywordCheck::not_configured());
        let value = serde_json::to_value(&completed).unwrap();
        assert_eq!(value["allKeywordsPresent"], true);
        assert!(value.get("skipped").is_none());
    }

    #[test]
    fn keyword_check_from_metrics() {
        let metrics = content::analyze(
            "<html><body>alpha alpha beta</body></html>",
            &["alpha".to_string(), "gamma".to_string()],
        );
        let check = KeywordCheck::from_metrics(&metrics);
        assert_eq!(check.matches["alpha"], 2);
        assert_eq!(check.total_matches, 2);
        assert_eq!(check.missing_keywords, vec!["gamma".to_string()]);
        assert!(!check.all_keywords_present);
        assert!(check.message.is_none());
    }
}
