//! Export properties over entries that went through the store.

use std::sync::Arc;

use serde_json::json;

use sitesentry::export::{logs_to_csv, logs_to_json};
use sitesentry::models::{LogStatus, NewLogEntry, Severity};
use sitesentry::storage::{init_memory_pool, run_migrations, LogQuery, LogStore, SqliteStore};

async fn store() -> Arc<SqliteStore> {
    let pool = init_memory_pool().await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    Arc::new(SqliteStore::new(pool))
}

fn tricky_entry() -> NewLogEntry {
    NewLogEntry {
        entry_type: "site".into(),
        action: "update".into(),
        message: "renamed to \"Acme, Inc.\"".into(),
        user_id: "user-1".into(),
        site_id: Some("s1".into()),
        site_name: Some("Acme, Inc.".into()),
        status: Some(LogStatus::Success),
        severity: Some(Severity::Low),
        details: Some(json!({"old": "Acme", "new": "Acme, Inc.", "note": "a \"quoted\" value"})),
        metadata: Some(json!({"origin": "api"})),
        duration_ms: Some(42),
        tags: vec!["rename".into(), "audit".into()],
        ..Default::default()
    }
}

#[tokio::test]
async fn csv_rows_survive_re_parsing_with_commas_and_quotes() {
    let store = store().await;
    store.append(tricky_entry()).await.expect("append");
    let logs = store.query(&LogQuery::default()).await.expect("query");

    let csv_text = logs_to_csv(&logs).expect("csv");

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let header = reader.headers().expect("header").clone();
    let record = reader
        .records()
        .next()
        .expect("one row")
        .expect("valid row");

    // Re-splitting outside quotes recovers the original field count.
    assert_eq!(record.len(), header.len());

    // Fields with embedded commas and quotes come back intact.
    assert_eq!(&record[3], "renamed to \"Acme, Inc.\"");
    assert_eq!(&record[6], "Acme, Inc.");

    // Embedded objects are JSON strings that parse back to the original.
    let details: serde_json::Value = serde_json::from_str(&record[9]).expect("details");
    assert_eq!(details["note"], "a \"quoted\" value");
    let tags: Vec<String> = serde_json::from_str(&record[13]).expect("tags");
    assert_eq!(tags, vec!["rename", "audit"]);
}

#[tokio::test]
async fn csv_header_covers_json_keys_of_first_log() {
    let store = store().await;
    store.append(tricky_entry()).await.expect("append");
    let logs = store.query(&LogQuery::default()).await.expect("query");

    let json_text = logs_to_json(&logs).expect("json");
    let parsed: serde_json::Value = serde_json::from_str(&json_text).expect("parse");
    let first = parsed.as_array().expect("array")[0]
        .as_object()
        .expect("object")
        .clone();

    let csv_text = logs_to_csv(&logs).expect("csv");
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let header: Vec<String> = reader
        .headers()
        .expect("header")
        .iter()
        .map(str::to_string)
        .collect();

    // Every serialized key has a CSV column. The CSV's duration column is
    // named `duration`; JSON uses `durationMs`.
    for key in first.keys() {
        let column = match key.as_str() {
            "durationMs" => "duration",
            other => other,
        };
        assert!(
            header.iter().any(|h| h == column),
            "no CSV column for JSON key {key}"
        );
    }
}

#[tokio::test]
async fn json_export_round_trips_through_the_store() {
    let store = store().await;
    store.append(tricky_entry()).await.expect("append");
    store
        .append(NewLogEntry {
            entry_type: "auth".into(),
            action: "login".into(),
            message: "login ok".into(),
            user_id: "user-2".into(),
            ..Default::default()
        })
        .await
        .expect("append");

    let logs = store.query(&LogQuery::default()).await.expect("query");
    let text = logs_to_json(&logs).expect("json");
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("parse");
    let array = parsed.as_array().expect("array");

    assert_eq!(array.len(), 2);
    // Most recent first, as the store returns them.
    assert_eq!(array[0]["type"], "auth");
    assert_eq!(array[1]["type"], "site");
    assert_eq!(array[1]["details"]["new"], "Acme, Inc.");
}
