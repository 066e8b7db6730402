//! Hotspot analysis.
//!
//! Merges performance issues and TLS inspection output into a categorized,
//! severity-ranked list of actionable findings, plus an overall health
//! verdict for the site. Pure over its inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{LARGE_IMAGE_DIMENSION_PX, SSL_EXPIRY_CRITICAL_DAYS, SSL_EXPIRY_WARN_DAYS};
use crate::content::ImageDetail;
use crate::models::{HealthStatus, IssueCategory, IssueKind, Severity, Site};
use crate::performance::PerformanceResult;
use crate::tls::SslCheck;
use crate::utils::round1;

/// One categorized, severity-tagged finding with remediation advice.
#[derive(Debug, Clone, Serialize)]
pub struct Hotspot {
    /// Report category.
    pub category: IssueCategory,
    /// The specific issue.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Urgency.
    pub severity: Severity,
    /// What was observed.
    pub description: String,
    /// Fixed remediation advice for this issue kind.
    pub recommendation: &'static str,
    /// Consequence of leaving it unfixed.
    pub impact: &'static str,
    /// Affected images, for image-scoped findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected: Option<Vec<ImageDetail>>,
}

/// Hotspot counts per category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    /// Performance findings.
    pub performance: usize,
    /// Security findings.
    pub security: usize,
    /// Accessibility findings.
    pub accessibility: usize,
    /// SEO findings.
    pub seo: usize,
}

/// Overall health verdict derived from the hotspot list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallHealth {
    /// Verdict bucket.
    pub status: HealthStatus,
    /// Health percentage with per-bucket floors.
    pub percentage: u8,
    /// Weighted issue score (lower is better), one decimal.
    pub score: f64,
}

/// Site identity echoed in the report.
#[derive(Debug, Clone, Serialize)]
pub struct SiteRef {
    /// Site id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Target URL.
    pub url: String,
}

/// The full hotspot analysis for one site at one point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotReport {
    /// When the analysis ran.
    pub timestamp: DateTime<Utc>,
    /// Which site it concerns.
    pub site: SiteRef,
    /// Total findings.
    pub total_issues: usize,
    /// Findings with high severity.
    pub critical_issues: usize,
    /// Findings per category.
    pub by_category: CategoryCounts,
    /// Ranked findings, highest severity first.
    pub hotspots: Vec<Hotspot>,
    /// Overall verdict.
    pub overall_health: OverallHealth,
}

/// Builds the hotspot report for a site from its performance analysis and
/// optional TLS inspection.
pub fn analyze(
    site: &Site,
    performance: &PerformanceResult,
    ssl: Option<&SslCheck>,
) -> HotspotReport {
    let mut hotspots = Vec::new();

    for issue in &performance.issues {
        hotspots.push(Hotspot {
            category: issue.kind.category(),
            kind: issue.kind,
            severity: issue.severity,
            description: issue.message.clone(),
            recommendation: issue.kind.recommendation(),
            impact: match issue.severity {
                Severity::High | Severity::Critical => "High impact on user experience",
                Severity::Medium => "Moderate impact on user experience",
                Severity::Low => "Low impact on user experience",
            },
            affected: None,
        });
    }

    match ssl {
        Some(SslCheck::Invalid { message, .. }) => {
            hotspots.push(Hotspot {
                category: IssueCategory::Security,
                kind: IssueKind::InvalidSsl,
                severity: Severity::High,
                description: if message.is_empty() {
                    "Invalid SSL certificate".to_string()
                } else {
                    message.clone()
                },
                recommendation: IssueKind::InvalidSsl.recommendation(),
                impact: "High impact on security and user trust",
                affected: None,
            });
        }
        Some(SslCheck::Valid(info)) if info.days_remaining < SSL_EXPIRY_WARN_DAYS => {
            hotspots.push(Hotspot {
                category: IssueCategory::Security,
                kind: IssueKind::ExpiringSsl,
                severity: if info.days_remaining < SSL_EXPIRY_CRITICAL_DAYS {
                    Severity::High
                } else {
                    Severity::Medium
                },
                description: format!(
                    "SSL certificate expires in {} days",
                    info.days_remaining
                ),
                recommendation: IssueKind::ExpiringSsl.recommendation(),
                impact: "Potential service interruption if it expires",
                affected: None,
            });
        }
        _ => {}
    }

    let large_images: Vec<ImageDetail> = performance
        .image_details
        .iter()
        .filter(|img| img.exceeds_dimension(LARGE_IMAGE_DIMENSION_PX))
        .cloned()
        .collect();
    if !large_images.is_empty() {
        hotspots.push(Hotspot {
            category: IssueCategory::Performance,
            kind: IssueKind::LargeImages,
            severity: Severity::Medium,
            description: format!("{} images with excessive dimensions", large_images.len()),
            recommendation: IssueKind::LargeImages.recommendation(),
            impact: "Increases load time and wastes bandwidth",
            affected: Some(large_images),
        });
    }

    let images_without_alt: Vec<ImageDetail> = performance
        .image_details
        .iter()
        .filter(|img| img.missing_alt())
        .cloned()
        .collect();
    if !images_without_alt.is_empty() {
        hotspots.push(Hotspot {
            category: IssueCategory::Accessibility,
            kind: IssueKind::MissingAlt,
            severity: Severity::Medium,
            description: format!("{} images without alt text", images_without_alt.len()),
            recommendation: IssueKind::MissingAlt.recommendation(),
            impact: "Reduces accessibility and hurts SEO",
            affected: Some(images_without_alt),
        });
    }

    rank_hotspots(&mut hotspots);

    let total_issues = hotspots.len();
    let critical_issues = hotspots
        .iter()
        .filter(|h| h.severity == Severity::High)
        .count();
    let by_category = CategoryCounts {
        performance: count_category(&hotspots, IssueCategory::Performance),
        security: count_category(&hotspots, IssueCategory::Security),
        accessibility: count_category(&hotspots, IssueCategory::Accessibility),
        seo: count_category(&hotspots, IssueCategory::Seo),
    };
    let overall_health = overall_health(&hotspots);

    HotspotReport {
        timestamp: Utc::now(),
        site: SiteRef {
            id: site.id.clone(),
            name: site.name.clone(),
            url: site.url.clone(),
        },
        total_issues,
        critical_issues,
        by_category,
        hotspots,
        overall_health,
    }
}

/// Orders hotspots by descending severity weight. Stable: same-severity
/// findings keep their discovery order.
pub fn rank_hotspots(hotspots: &mut [Hotspot]) {
    hotspots.sort_by_key(|h| std::cmp::Reverse(h.severity.weight()));
}

/// Derives the overall health verdict from a hotspot list.
///
/// Weighted issue score: high 5, medium 2, low 0.5. Any high finding (or a
/// score above 10) is critical; the percentage floors per bucket keep a
/// warning site above 50% and a good site above 80%.
pub fn overall_health(hotspots: &[Hotspot]) -> OverallHealth {
    let high = hotspots
        .iter()
        .filter(|h| h.severity == Severity::High)
        .count() as f64;
    let medium = hotspots
        .iter()
        .filter(|h| h.severity == Severity::Medium)
        .count() as f64;
    let low = hotspots
        .iter()
        .filter(|h| h.severity == Severity::Low)
        .count() as f64;

    let score = high * 5.0 + medium * 2.0 + low * 0.5;

    let (status, percentage) = if score > 10.0 || high > 0.0 {
        (HealthStatus::Critical, (100.0 - score * 5.0).max(0.0))
    } else if score > 5.0 || medium > 3.0 {
        (HealthStatus::Warning, (100.0 - score * 5.0).max(50.0))
    } else if score > 0.0 {
        (HealthStatus::Good, (100.0 - score * 2.0).max(80.0))
    } else {
        (HealthStatus::Healthy, 100.0)
    };

    OverallHealth {
        status,
        percentage: percentage.round() as u8,
        score: round1(score),
    }
}

fn count_category(hotspots: &[Hotspot], category: IssueCategory) -> usize {
    hotspots.iter().filter(|h| h.category == category).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hotspot(kind: IssueKind, severity: Severity, description: &str) -> Hotspot {
        Hotspot {
            category: kind.category(),
            kind,
            severity,
            description: description.to_string(),
            recommendation: kind.recommendation(),
            impact: "",
            affected: None,
        }
    }

    fn test_site() -> Site {
        Site {
            id: "site-1".into(),
            name: "Acme".into(),
            url: "https://acme.test".into(),
            owner_user_id: "user-1".into(),
            status: "active".into(),
            ssl_check_enabled: true,
            keywords: vec![],
            monitor_settings: Default::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn perf_with_images(images: Vec<ImageDetail>) -> PerformanceResult {
        let metrics = crate::content::analyze("<html><body></body></html>", &[]);
        let mut result = crate::performance::analyze(100, 10, &metrics);
        result.image_details = images;
        result
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mut list = vec![
            hotspot(IssueKind::MissingAlt, Severity::Low, "low-1"),
            hotspot(IssueKind::InvalidSsl, Severity::High, "high-1"),
            hotspot(IssueKind::LargeImages, Severity::Medium, "med-1"),
            hotspot(IssueKind::ManyScripts, Severity::Medium, "med-2"),
        ];
        rank_hotspots(&mut list);
        let order: Vec<&str> = list.iter().map(|h| h.description.as_str()).collect();
        assert_eq!(order, vec!["high-1", "med-1", "med-2", "low-1"]);
    }

    #[test]
    fn health_no_issues_is_healthy() {
        let health = overall_health(&[]);
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.percentage, 100);
        assert_eq!(health.score, 0.0);
    }

    #[test]
    fn health_single_high_is_critical() {
        let list = vec![hotspot(IssueKind::InvalidSsl, Severity::High, "x")];
        let health = overall_health(&list);
        assert_eq!(health.status, HealthStatus::Critical);
        assert_eq!(health.score, 5.0);
        assert_eq!(health.percentage, 75);
    }

    #[test]
    fn health_three_mediums_is_warning() {
        let list = vec![
            hotspot(IssueKind::LargeImages, Severity::Medium, "a"),
            hotspot(IssueKind::MissingAlt, Severity::Medium, "b"),
            hotspot(IssueKind::ManyScripts, Severity::Medium, "c"),
        ];
        let health = overall_health(&list);
        assert_eq!(health.status, HealthStatus::Warning);
        assert_eq!(health.score, 6.0);
        assert_eq!(health.percentage, 70);
    }

    #[test]
    fn health_single_medium_is_good() {
        let list = vec![hotspot(IssueKind::LargeImages, Severity::Medium, "a")];
        let health = overall_health(&list);
        assert_eq!(health.status, HealthStatus::Good);
        assert_eq!(health.percentage, 96);
    }

    #[test]
    fn health_low_only_keeps_fractional_score() {
        let list = vec![hotspot(IssueKind::MissingAlt, Severity::Low, "a")];
        let health = overall_health(&list);
        assert_eq!(health.status, HealthStatus::Good);
        assert_eq!(health.score, 0.5);
        assert_eq!(health.percentage, 99);
    }

    #[test]
    fn health_heavy_site_floors_at_zero() {
        let list = vec![
            hotspot(IssueKind::InvalidSsl, Severity::High, "a"),
            hotspot(IssueKind::SlowLoading, Severity::High, "b"),
            hotspot(IssueKind::LargePage, Severity::High, "c"),
            hotspot(IssueKind::ManyScripts, Severity::High, "d"),
            hotspot(IssueKind::LargeImages, Severity::High, "e"),
        ];
        let health = overall_health(&list);
        assert_eq!(health.status, HealthStatus::Critical);
        assert_eq!(health.percentage, 0);
    }

    #[test]
    fn expiring_ssl_severity_depends_on_days() {
        let site = test_site();
        let perf = perf_with_images(vec![]);

        let info = crate::tls::SslInfo {
            valid: true,
            issuer: "CA".into(),
            subject: "acme.test".into(),
            valid_from: Utc::now(),
            valid_to: Utc::now(),
            days_remaining: 5,
            fingerprint: String::new(),
            serial_number: String::new(),
        };
        let report = analyze(&site, &perf, Some(&SslCheck::Valid(info.clone())));
        assert_eq!(report.hotspots[0].kind, IssueKind::ExpiringSsl);
        assert_eq!(report.hotspots[0].severity, Severity::High);

        let softer = crate::tls::SslInfo {
            days_remaining: 20,
            ..info
        };
        let report = analyze(&site, &perf, Some(&SslCheck::Valid(softer)));
        assert_eq!(report.hotspots[0].severity, Severity::Medium);
    }

    #[test]
    fn invalid_ssl_is_high_security_finding() {
        let site = test_site();
        let perf = perf_with_images(vec![]);
        let ssl = SslCheck::invalid("handshake refused");

        let report = analyze(&site, &perf, Some(&ssl));
        assert_eq!(report.total_issues, 1);
        assert_eq!(report.critical_issues, 1);
        assert_eq!(report.by_category.security, 1);
        assert_eq!(report.hotspots[0].description, "handshake refused");
        assert_eq!(report.overall_health.status, HealthStatus::Critical);
    }

    #[test]
    fn image_findings_are_aggregated() {
        let site = test_site();
        let perf = perf_with_images(vec![
            ImageDetail {
                src: "big.jpg".into(),
                width: Some(2000),
                height: Some(100),
                alt: Some("big".into()),
            },
            ImageDetail {
                src: "noalt.jpg".into(),
                width: Some(10),
                height: Some(10),
                alt: None,
            },
            ImageDetail {
                src: "fine.jpg".into(),
                width: Some(100),
                height: Some(100),
                alt: Some("ok".into()),
            },
        ]);

        let report = analyze(&site, &perf, None);
        assert_eq!(report.total_issues, 2);
        let large = report
            .hotspots
            .iter()
            .find(|h| h.kind == IssueKind::LargeImages)
            .expect("large-images hotspot");
        assert_eq!(large.affected.as_ref().map(Vec::len), Some(1));
        let alt = report
            .hotspots
            .iter()
            .find(|h| h.kind == IssueKind::MissingAlt)
            .expect("missing-alt hotspot");
        assert_eq!(alt.affected.as_ref().map(Vec::len), Some(1));
        assert_eq!(report.by_category.accessibility, 1);
        assert_eq!(report.by_category.performance, 1);
    }
}
