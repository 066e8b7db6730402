//! Log slice summarization.
//!
//! Aggregates a slice of activity logs into rates, top actions/sites, and a
//! severity histogram. Known limitation, preserved on purpose: summaries are
//! computed over the page a query returned, not the full filtered set, so
//! the top-5 lists describe the current page only.

use serde::Serialize;

use crate::config::SUMMARY_TOP_N;
use crate::models::{ActivityLogEntry, LogStatus, Severity};
use crate::utils::round2;

/// One action with its occurrence count.
#[derive(Debug, Clone, Serialize)]
pub struct ActionCount {
    /// The action string.
    pub action: String,
    /// Occurrences in the slice.
    pub count: usize,
}

/// One site with its occurrence count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCount {
    /// Site id.
    pub site_id: String,
    /// Site display name, when the entries carried one.
    pub site_name: Option<String>,
    /// Occurrences in the slice.
    pub count: usize,
}

/// Counts per severity level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeverityDistribution {
    /// Low-severity entries.
    pub low: usize,
    /// Medium-severity entries.
    pub medium: usize,
    /// High-severity entries.
    pub high: usize,
    /// Critical entries.
    pub critical: usize,
}

/// Aggregate view of a log slice. Recomputed per query, never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsSummary {
    /// Entries in the slice.
    pub total_logs: usize,
    /// Percentage of success-status entries.
    pub success_rate: f64,
    /// Percentage of error-status entries.
    pub error_rate: f64,
    /// Mean duration of entries that recorded one, in milliseconds.
    pub avg_response_time: f64,
    /// Up to five most frequent actions.
    pub most_common_actions: Vec<ActionCount>,
    /// Up to five most frequently referenced sites.
    pub most_affected_sites: Vec<SiteCount>,
    /// Entries per severity level.
    pub severity_distribution: SeverityDistribution,
}

/// Summarizes a log slice. All rates are 0 for an empty slice.
pub fn generate_summary(logs: &[ActivityLogEntry]) -> LogsSummary {
    let total = logs.len();

    let (success_rate, error_rate) = if total == 0 {
        (0.0, 0.0)
    } else {
        let successes = logs
            .iter()
            .filter(|l| l.status == LogStatus::Success)
            .count();
        let errors = logs.iter().filter(|l| l.status == LogStatus::Error).count();
        (
            round2(successes as f64 / total as f64 * 100.0),
            round2(errors as f64 / total as f64 * 100.0),
        )
    };

    let durations: Vec<u64> = logs.iter().filter_map(|l| l.duration_ms).collect();
    let avg_response_time = if durations.is_empty() {
        0.0
    } else {
        round2(durations.iter().sum::<u64>() as f64 / durations.len() as f64)
    };

    let most_common_actions = top_counts(logs.iter().map(|l| l.action.clone()))
        .into_iter()
        .map(|(action, count)| ActionCount { action, count })
        .collect();

    let most_affected_sites = top_counts(
        logs.iter()
            .filter_map(|l| l.site_id.clone().map(|id| (id, l.site_name.clone()))),
    )
    .into_iter()
    .map(|((site_id, site_name), count)| SiteCount {
        site_id,
        site_name,
        count,
    })
    .collect();

    let mut severity_distribution = SeverityDistribution::default();
    for log in logs {
        match log.severity {
            Severity::Low => severity_distribution.low += 1,
            Severity::Medium => severity_distribution.medium += 1,
            Severity::High => severity_distribution.high += 1,
            Severity::Critical => severity_distribution.critical += 1,
        }
    }

    LogsSummary {
        total_logs: total,
        success_rate,
        error_rate,
        avg_response_time,
        most_common_actions,
        most_affected_sites,
        severity_distribution,
    }
}

/// Counts occurrences preserving first-seen order, then returns the top
/// entries by count. The stable sort keeps ties in encounter order.
fn top_counts<K: Clone + PartialEq>(items: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(k, _)| *k == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts.truncate(SUMMARY_TOP_N);
    counts
}
