//! JSON export.

use anyhow::{Context, Result};

use crate::models::ActivityLogEntry;

/// Serializes a log slice as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn logs_to_json(logs: &[ActivityLogEntry]) -> Result<String> {
    serde_json::to_string_pretty(logs).context("Failed to serialize logs to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogStatus, Severity};
    use chrono::Utc;
    use serde_json::json;

    fn sample() -> ActivityLogEntry {
        ActivityLogEntry {
            id: "7".into(),
            entry_type: "monitor".into(),
            action: "check".into(),
            message: "Monitor check for Acme: Success".into(),
            user_id: "u1".into(),
            site_id: Some("s1".into()),
            site_name: Some("Acme".into()),
            status: LogStatus::Success,
            severity: Severity::Low,
            details: json!({"responseTime": 120}),
            metadata: json!({"url": "https://acme.test"}),
            duration_ms: Some(120),
            ip: None,
            tags: vec!["probe".into()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn exports_parseable_array() {
        let text = logs_to_json(&[sample(), sample()]).expect("export");
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
        let array = value.as_array().expect("array");
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["type"], "monitor");
        assert_eq!(array[0]["details"]["responseTime"], 120);
        assert_eq!(array[0]["durationMs"], 120);
    }

    #[test]
    fn empty_slice_exports_empty_array() {
        let text = logs_to_json(&[]).expect("export");
        assert_eq!(text.trim(), "[]");
    }
}
