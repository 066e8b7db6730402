//! Monitoring history reconstruction.
//!
//! Rebuilds time series (response time, availability, SSL, performance
//! score) from a site's `monitor`-typed log entries. Entries arrive from the
//! store most-recent-first and series keep that order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ActivityLogEntry, LogStatus};
use crate::utils::round2;

/// Options for a history query.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Maximum log entries read (default 100).
    pub limit: Option<u32>,
    /// Window start.
    pub start_date: Option<DateTime<Utc>>,
    /// Window end.
    pub end_date: Option<DateTime<Utc>>,
    /// Restrict to specific check actions (empty reads all).
    pub actions: Vec<String>,
}

/// One response-time sample.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseTimePoint {
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// Response time in milliseconds.
    pub value: u64,
    /// Check outcome status.
    pub status: LogStatus,
}

/// One availability sample: 1 when the check succeeded, 0 otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityPoint {
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// 1 for available, 0 for unavailable.
    pub value: u8,
}

/// One SSL inspection sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslPoint {
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// Whether a certificate was extracted.
    pub valid: bool,
    /// Days until expiry, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

/// One performance analysis sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// Performance score.
    pub score: u64,
    /// Load time in milliseconds, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time: Option<u64>,
}

/// The four reconstructed series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySeries {
    /// Response-time samples from basic checks.
    pub response_time: Vec<ResponseTimePoint>,
    /// Availability samples from basic checks.
    pub availability: Vec<AvailabilityPoint>,
    /// SSL inspection samples.
    pub ssl: Vec<SslPoint>,
    /// Performance analysis samples.
    pub performance: Vec<PerformancePoint>,
}

/// Aggregates over the reconstructed window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Basic checks in the window.
    pub total_checks: usize,
    /// Mean response time, rounded to whole milliseconds (0 when empty).
    pub avg_response_time: u64,
    /// Share of available checks as a percentage, two decimals.
    pub uptime: f64,
    /// The most recent response-time sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<ResponseTimePoint>,
}

/// The covered time window.
#[derive(Debug, Clone, Serialize)]
pub struct Period {
    /// Window start: the requested start date, else the oldest entry read.
    pub from: Option<DateTime<Utc>>,
    /// Window end: the requested end date, else the newest entry read.
    pub to: Option<DateTime<Utc>>,
}

/// Full history response for one site.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringHistory {
    /// The site the history concerns.
    pub site_id: String,
    /// The covered window.
    pub period: Period,
    /// Aggregates over the window.
    pub summary: HistorySummary,
    /// The reconstructed series.
    pub history: HistorySeries,
}

/// Groups a site's monitor log entries into series and aggregates.
pub(crate) fn build_history(
    site_id: &str,
    logs: &[ActivityLogEntry],
    options: &HistoryOptions,
) -> MonitoringHistory {
    let mut response_time = Vec::new();
    let mut availability = Vec::new();
    let mut ssl = Vec::new();
    let mut performance = Vec::new();

    for log in logs {
        match log.action.as_str() {
            "check" => {
                if let Some(value) = log.details.get("responseTime").and_then(|v| v.as_u64()) {
                    response_time.push(ResponseTimePoint {
                        timestamp: log.created_at,
                        value,
                        status: log.status,
                    });
                    availability.push(AvailabilityPoint {
                        timestamp: log.created_at,
                        value: u8::from(log.status == LogStatus::Success),
                    });
                }
            }
            "ssl-check" => {
                ssl.push(SslPoint {
                    timestamp: log.created_at,
                    valid: log
                        .details
                        .get("valid")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false),
                    days_remaining: log.details.get("daysRemaining").and_then(|v| v.as_i64()),
                });
            }
            "performance" => {
                if let Some(score) = log.details.get("score").and_then(|v| v.as_u64()) {
                    performance.push(PerformancePoint {
                        timestamp: log.created_at,
                        score,
                        load_time: log.details.get("loadTime").and_then(|v| v.as_u64()),
                    });
                }
            }
            _ => {}
        }
    }

    let avg_response_time = if response_time.is_empty() {
        0
    } else {
        let sum: u64 = response_time.iter().map(|p| p.value).sum();
        (sum as f64 / response_time.len() as f64).round() as u64
    };

    let uptime = if availability.is_empty() {
        0.0
    } else {
        let up: u64 = availability.iter().map(|p| u64::from(p.value)).sum();
        round2(up as f64 / availability.len() as f64 * 100.0)
    };

    let period = Period {
        from: options.start_date.or_else(|| logs.last().map(|l| l.created_at)),
        to: options.end_date.or_else(|| logs.first().map(|l| l.created_at)),
    };

    MonitoringHistory {
        site_id: site_id.to_string(),
        period,
        summary: HistorySummary {
            total_checks: response_time.len(),
            avg_response_time,
            uptime,
            last_check: response_time.first().cloned(),
        },
        history: HistorySeries {
            response_time,
            availability,
            ssl,
            performance,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use serde_json::json;

    fn monitor_log(
        action: &str,
        status: LogStatus,
        details: serde_json::Value,
        minutes_ago: i64,
    ) -> ActivityLogEntry {
        ActivityLogEntry {
            id: "1".into(),
            entry_type: "monitor".into(),
            action: action.into(),
            message: String::new(),
            user_id: "u1".into(),
            site_id: Some("s1".into()),
            site_name: Some("Acme".into()),
            status,
            severity: Severity::Low,
            details,
            metadata: json!({}),
            duration_ms: None,
            ip: None,
            tags: vec![],
            created_at: Utc::now() - chrono::Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn empty_history_is_all_zero() {
        let history = build_history("s1", &[], &HistoryOptions::default());
        assert_eq!(history.summary.total_checks, 0);
        assert_eq!(history.summary.avg_response_time, 0);
        assert_eq!(history.summary.uptime, 0.0);
        assert!(history.summary.last_check.is_none());
        assert!(history.period.from.is_none());
        assert!(history.period.to.is_none());
    }

    #[test]
    fn series_are_grouped_by_action() {
        // Most-recent-first, as the store returns them.
        let logs = vec![
            monitor_log("check", LogStatus::Success, json!({"responseTime": 120}), 0),
            monitor_log("ssl-check", LogStatus::Success, json!({"valid": true, "daysRemaining": 42}), 1),
            monitor_log("performance", LogStatus::Success, json!({"score": 88, "loadTime": 450}), 2),
            monitor_log("check", LogStatus::Error, json!({"responseTime": 0}), 3),
            monitor_log("hotspots", LogStatus::Success, json!({"totalIssues": 1}), 4),
        ];

        let history = build_history("s1", &logs, &HistoryOptions::default());
        assert_eq!(history.history.response_time.len(), 2);
        assert_eq!(history.history.availability.len(), 2);
        assert_eq!(history.history.ssl.len(), 1);
        assert_eq!(history.history.performance.len(), 1);
        assert_eq!(history.history.ssl[0].days_remaining, Some(42));
        assert_eq!(history.history.performance[0].score, 88);

        // Order mirrors the read order.
        assert_eq!(history.history.response_time[0].value, 120);
        assert_eq!(history.history.availability[0].value, 1);
        assert_eq!(history.history.availability[1].value, 0);
    }

    #[test]
    fn uptime_and_average_math() {
        let logs = vec![
            monitor_log("check", LogStatus::Success, json!({"responseTime": 100}), 0),
            monitor_log("check", LogStatus::Success, json!({"responseTime": 200}), 1),
            monitor_log("check", LogStatus::Error, json!({"responseTime": 900}), 2),
        ];

        let history = build_history("s1", &logs, &HistoryOptions::default());
        assert_eq!(history.summary.total_checks, 3);
        assert_eq!(history.summary.avg_response_time, 400);
        assert_eq!(history.summary.uptime, 66.67);
        assert_eq!(
            history.summary.last_check.as_ref().map(|p| p.value),
            Some(100)
        );
    }

    #[test]
    fn checks_without_response_time_are_ignored() {
        let logs = vec![monitor_log("check", LogStatus::Error, json!({}), 0)];
        let history = build_history("s1", &logs, &HistoryOptions::default());
        assert_eq!(history.summary.total_checks, 0);
        assert!(history.history.availability.is_empty());
    }

    #[test]
    fn period_prefers_requested_window() {
        let start = Utc::now() - chrono::Duration::days(7);
        let logs = vec![monitor_log("check", LogStatus::Success, json!({"responseTime": 1}), 0)];
        let history = build_history(
            "s1",
            &logs,
            &HistoryOptions {
                start_date: Some(start),
                ..Default::default()
            },
        );
        assert_eq!(history.period.from, Some(start));
        // No end date requested: falls back to the newest entry.
        assert_eq!(history.period.to, logs.first().map(|l| l.created_at));
    }
}
