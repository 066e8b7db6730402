//! Page performance analysis.
//!
//! Detects performance issues from load time, page weight, and resource
//! counts, and condenses them into a weighted 0–100 score. Both functions
//! are pure; the orchestrator feeds them from a single fetch.

use serde::Serialize;

use crate::config::{
    LARGE_PAGE_THRESHOLD_KB, MANY_SCRIPTS_THRESHOLD, MISSING_LAZY_THRESHOLD,
    SLOW_LOAD_THRESHOLD_MS, VERY_LARGE_PAGE_THRESHOLD_KB, VERY_SLOW_LOAD_THRESHOLD_MS,
};
use crate::content::{ContentMetrics, ImageDetail};
use crate::models::{IssueKind, Severity};

/// Resource counts carried in a performance result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCounts {
    /// `<img>` elements.
    pub images: usize,
    /// `<script>` elements.
    pub scripts: usize,
    /// Stylesheet links.
    pub stylesheets: usize,
    /// Preloaded font links.
    pub fonts: usize,
    /// Total elements in the document.
    pub total_elements: usize,
}

/// One detected performance issue.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceIssue {
    /// What was detected.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// How urgent it is.
    pub severity: Severity,
    /// Human-readable description with the measured value.
    pub message: String,
}

/// Full output of a performance analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceResult {
    /// Page load time in milliseconds.
    #[serde(rename = "loadTime")]
    pub load_time_ms: u64,
    /// Page size in kilobytes.
    #[serde(rename = "pageSize")]
    pub page_size_kb: u64,
    /// Resource counts.
    pub resources: ResourceCounts,
    /// Per-image attribute details, reused by the hotspot analyzer.
    #[serde(rename = "imageDetails")]
    pub image_details: Vec<ImageDetail>,
    /// Detected issues.
    pub issues: Vec<PerformanceIssue>,
    /// Weighted 0–100 score.
    pub score: u8,
}

/// Detects performance issues from page measurements.
pub fn detect_issues(
    load_time_ms: u64,
    page_size_kb: u64,
    script_count: usize,
    images_without_lazy: usize,
) -> Vec<PerformanceIssue> {
    let mut issues = Vec::new();

    if load_time_ms > SLOW_LOAD_THRESHOLD_MS {
        issues.push(PerformanceIssue {
            kind: IssueKind::SlowLoading,
            severity: if load_time_ms > VERY_SLOW_LOAD_THRESHOLD_MS {
                Severity::High
            } else {
                Severity::Medium
            },
            message: format!("Elevated load time: {load_time_ms}ms"),
        });
    }

    if script_count > MANY_SCRIPTS_THRESHOLD {
        issues.push(PerformanceIssue {
            kind: IssueKind::ManyScripts,
            severity: Severity::Medium,
            message: format!("High script count: {script_count}"),
        });
    }

    if page_size_kb > LARGE_PAGE_THRESHOLD_KB {
        issues.push(PerformanceIssue {
            kind: IssueKind::LargePage,
            severity: if page_size_kb > VERY_LARGE_PAGE_THRESHOLD_KB {
                Severity::High
            } else {
                Severity::Medium
            },
            message: format!("Page too large: {page_size_kb}KB"),
        });
    }

    if images_without_lazy > MISSING_LAZY_THRESHOLD {
        issues.push(PerformanceIssue {
            kind: IssueKind::MissingLazyLoading,
            severity: Severity::Medium,
            message: format!("{images_without_lazy} images without lazy loading"),
        });
    }

    issues
}

/// Computes the weighted performance score.
///
/// Four step-bucketed sub-scores (load time 40%, page size 20%, image+script
/// count 20%, issue count 20%) rounded to the nearest integer. Deterministic;
/// the bucket boundaries are part of the stored-result contract.
pub fn score(
    load_time_ms: u64,
    page_size_kb: u64,
    image_count: usize,
    script_count: usize,
    issue_count: usize,
) -> u8 {
    let load_time_score: f64 = match load_time_ms {
        t if t > 5000 => 0.0,
        t if t > 3000 => 30.0,
        t if t > 2000 => 60.0,
        t if t > 1000 => 80.0,
        _ => 100.0,
    };

    let page_size_score: f64 = match page_size_kb {
        s if s > 5000 => 0.0,
        s if s > 3000 => 30.0,
        s if s > 1500 => 60.0,
        s if s > 800 => 80.0,
        _ => 100.0,
    };

    let resources_score: f64 = match image_count + script_count {
        r if r > 80 => 0.0,
        r if r > 60 => 30.0,
        r if r > 40 => 60.0,
        r if r > 20 => 80.0,
        _ => 100.0,
    };

    let issues_score: f64 = match issue_count {
        i if i > 8 => 0.0,
        i if i > 5 => 30.0,
        i if i > 3 => 60.0,
        i if i > 0 => 80.0,
        _ => 100.0,
    };

    let final_score = load_time_score * 0.4
        + page_size_score * 0.2
        + resources_score * 0.2
        + issues_score * 0.2;

    final_score.round() as u8
}

/// Combines content metrics and timing into a full performance result.
pub fn analyze(load_time_ms: u64, page_size_kb: u64, metrics: &ContentMetrics) -> PerformanceResult {
    let issues = detect_issues(
        load_time_ms,
        page_size_kb,
        metrics.script_count,
        metrics.images_without_lazy_loading,
    );
    let score = score(
        load_time_ms,
        page_size_kb,
        metrics.image_count,
        metrics.script_count,
        issues.len(),
    );

    PerformanceResult {
        load_time_ms,
        page_size_kb,
        resources: ResourceCounts {
            images: metrics.image_count,
            scripts: metrics.script_count,
            stylesheets: metrics.stylesheet_count,
            fonts: metrics.font_count,
            total_elements: metrics.total_elements,
        },
        image_details: metrics.images.clone(),
        issues,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_deterministic_at_extremes() {
        assert_eq!(score(800, 500, 5, 5, 0), 100);
        assert_eq!(score(6000, 6000, 90, 90, 10), 0);
    }

    #[test]
    fn score_bucket_boundaries_are_exclusive() {
        // Exactly at a boundary stays in the better bucket.
        assert_eq!(score(1000, 500, 5, 5, 0), 100);
        assert_eq!(score(1001, 500, 5, 5, 0), 92);
        assert_eq!(score(800, 800, 5, 5, 0), 100);
        assert_eq!(score(800, 801, 5, 5, 0), 96);
    }

    #[test]
    fn score_mixed_weights() {
        // 0.4*60 + 0.2*80 + 0.2*80 + 0.2*80 = 72
        assert_eq!(score(2500, 900, 15, 15, 2), 72);
    }

    #[test]
    fn detect_issues_thresholds() {
        assert!(detect_issues(2000, 100, 5, 0).is_empty());

        let issues = detect_issues(2001, 100, 5, 0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::SlowLoading);
        assert_eq!(issues[0].severity, Severity::Medium);

        let issues = detect_issues(5001, 100, 5, 0);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn detect_issues_scripts_and_page_size() {
        let issues = detect_issues(100, 1600, 16, 0);
        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::ManyScripts, IssueKind::LargePage]);
        assert_eq!(issues[1].severity, Severity::Medium);

        let issues = detect_issues(100, 3001, 0, 0);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn detect_issues_lazy_loading() {
        assert!(detect_issues(100, 100, 0, 3).is_empty());
        let issues = detect_issues(100, 100, 0, 4);
        assert_eq!(issues[0].kind, IssueKind::MissingLazyLoading);
    }

    #[test]
    fn analyze_feeds_issue_count_into_score() {
        let metrics = crate::content::analyze("<html><body></body></html>", &[]);
        // Slow and heavy: slow-loading (high) + large-page (medium) issues.
        let result = analyze(5500, 3500, &metrics);
        assert_eq!(result.issues.len(), 2);
        // load 0*0.4 + size 30*0.2 + resources 100*0.2 + issues 80*0.2 = 42
        assert_eq!(result.score, 42);
        assert_eq!(result.resources.images, 0);
    }
}
