//! Anomaly detection over a slice of activity logs.
//!
//! Three rules, each pure over the slice it is given. Rules are evaluated on
//! the returned page of a query, not the full history — a deliberate match
//! with how the stored summaries have always been computed.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::{
    HIGH_ERROR_RATE_THRESHOLD, REPEATED_ERROR_MIN_COUNT, SLOW_OPERATION_SAMPLES,
    SLOW_OPERATION_THRESHOLD_MS,
};
use crate::models::{ActivityLogEntry, LogStatus, Severity};
use crate::utils::round2;

/// The anomaly patterns the detector can flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Error share of the slice exceeds the threshold.
    HighErrorRate,
    /// The same `type:action` signature failed repeatedly.
    RepeatedError,
    /// Operations slower than the latency threshold.
    SlowOperations,
}

impl AnomalyKind {
    /// Stable string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::HighErrorRate => "high_error_rate",
            AnomalyKind::RepeatedError => "repeated_error",
            AnomalyKind::SlowOperations => "slow_operations",
        }
    }
}

/// One detected anomaly. Derived transiently; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Anomaly {
    /// Which rule fired.
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    /// Human-readable explanation.
    pub message: String,
    /// Urgency.
    pub severity: Severity,
    /// Rule-specific evidence.
    pub details: Value,
}

/// Scans a log slice for anomalies.
pub fn detect_anomalies(logs: &[ActivityLogEntry]) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    let total = logs.len();
    let error_count = logs
        .iter()
        .filter(|l| l.status == LogStatus::Error)
        .count();

    if total > 0 {
        let error_rate = (error_count as f64 / total as f64) * 100.0;
        if error_rate > HIGH_ERROR_RATE_THRESHOLD {
            anomalies.push(Anomaly {
                kind: AnomalyKind::HighErrorRate,
                message: format!("High error rate: {:.0}% of recent operations failed", error_rate),
                severity: Severity::Medium,
                details: json!({
                    "errorRate": round2(error_rate),
                    "threshold": HIGH_ERROR_RATE_THRESHOLD,
                    "errorCount": error_count,
                    "totalLogs": total,
                }),
            });
        }
    }

    // Group error entries by type:action signature, preserving first-seen
    // order so repeated runs report groups deterministically.
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for log in logs.iter().filter(|l| l.status == LogStatus::Error) {
        let signature = format!("{}:{}", log.entry_type, log.action);
        let count = counts.entry(signature.clone()).or_insert(0);
        if *count == 0 {
            order.push(signature);
        }
        *count += 1;
    }
    for signature in order {
        let count = counts[&signature];
        if count >= REPEATED_ERROR_MIN_COUNT {
            anomalies.push(Anomaly {
                kind: AnomalyKind::RepeatedError,
                message: format!("Repeated error in {signature}: {count} occurrences"),
                severity: Severity::High,
                details: json!({
                    "signature": signature,
                    "count": count,
                }),
            });
        }
    }

    let slow: Vec<&ActivityLogEntry> = logs
        .iter()
        .filter(|l| l.duration_ms.is_some_and(|d| d > SLOW_OPERATION_THRESHOLD_MS))
        .collect();
    if !slow.is_empty() {
        let samples: Vec<Value> = slow
            .iter()
            .take(SLOW_OPERATION_SAMPLES)
            .map(|l| {
                json!({
                    "type": l.entry_type,
                    "action": l.action,
                    "durationMs": l.duration_ms,
                    "createdAt": l.created_at,
                })
            })
            .collect();
        anomalies.push(Anomaly {
            kind: AnomalyKind::SlowOperations,
            message: format!("{} slow operations detected", slow.len()),
            severity: Severity::Medium,
            details: json!({
                "count": slow.len(),
                "thresholdMs": SLOW_OPERATION_THRESHOLD_MS,
                "samples": samples,
            }),
        });
    }

    anomalies
}
