//! Fleet-wide health overview.
//!
//! Fans out one latest-full-check lookup per site on a bounded pool and
//! folds the results into online/offline and health-bucket counts. Output
//! order follows input order regardless of completion order, and a site
//! whose history cannot be read degrades to unknown instead of failing the
//! whole overview.

use futures::stream::{self, StreamExt};
use log::warn;
use serde::Serialize;

use crate::config::OVERVIEW_CONCURRENCY;
use crate::models::Site;
use crate::storage::{LogStore, SiteStore};

use super::MonitorService;

/// Site counts per health label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthBuckets {
    /// Sites labeled "Bueno".
    pub good: usize,
    /// Sites labeled "Regular".
    pub average: usize,
    /// Sites labeled "Deficiente".
    pub poor: usize,
    /// Sites with no readable history or an unrecognized label.
    pub unknown: usize,
}

/// One site's line in the overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOverviewEntry {
    /// Site id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Target URL.
    pub url: String,
    /// `online`, `offline`, or `unknown`.
    pub status: String,
    /// The persisted health label, or `Unknown`.
    pub health: String,
    /// When the site was last fully checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<chrono::DateTime<chrono::Utc>>,
}

/// The fleet dashboard payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    /// Sites considered.
    pub total_sites: usize,
    /// Sites whose last full check found them available.
    pub sites_online: usize,
    /// Sites whose last full check found them unavailable.
    pub sites_offline: usize,
    /// Health-bucket counts.
    pub sites_by_health: HealthBuckets,
    /// Per-site lines, in input order.
    pub sites_summary: Vec<SiteOverviewEntry>,
}

pub(super) async fn build_overview<S: SiteStore, L: LogStore>(
    monitor: &MonitorService<S, L>,
    sites: &[Site],
) -> AdminOverview {
    // `buffered` keeps output in input order while running lookups
    // concurrently.
    let entries: Vec<SiteOverviewEntry> = stream::iter(sites)
        .map(|site| site_entry(monitor, site))
        .buffered(OVERVIEW_CONCURRENCY)
        .collect()
        .await;

    let mut overview = AdminOverview {
        total_sites: sites.len(),
        sites_online: 0,
        sites_offline: 0,
        sites_by_health: HealthBuckets::default(),
        sites_summary: Vec::with_capacity(entries.len()),
    };

    for entry in entries {
        match entry.status.as_str() {
            "online" => overview.sites_online += 1,
            "offline" => overview.sites_offline += 1,
            _ => {}
        }
        match entry.health.as_str() {
            "Bueno" => overview.sites_by_health.good += 1,
            "Regular" => overview.sites_by_health.average += 1,
            "Deficiente" => overview.sites_by_health.poor += 1,
            _ => overview.sites_by_health.unknown += 1,
        }
        overview.sites_summary.push(entry);
    }

    overview
}

async fn site_entry<S: SiteStore, L: LogStore>(
    monitor: &MonitorService<S, L>,
    site: &Site,
) -> SiteOverviewEntry {
    let mut entry = SiteOverviewEntry {
        id: site.id.clone(),
        name: site.name.clone(),
        url: site.url.clone(),
        status: "unknown".to_string(),
        health: "Unknown".to_string(),
        last_check: None,
    };

    let latest = match monitor.latest_full_check(&site.id).await {
        Ok(latest) => latest,
        Err(e) => {
            warn!("Could not read history for site {}: {e}", site.id);
            return entry;
        }
    };

    if let Some(log) = latest {
        let available = log
            .details
            .pointer("/basic/available")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        entry.status = if available { "online" } else { "offline" }.to_string();
        entry.health = log
            .details
            .get("health")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();
        entry.last_check = Some(log.created_at);
    }

    entry
}
