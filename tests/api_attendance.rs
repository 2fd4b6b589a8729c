use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use schoold::config::Config;
use schoold::http::{router, AppState};
use schoold::store::open_store;

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

async fn spawn_app_with(store_available: bool) -> String {
    let data_dir = temp_dir("schoold-data");
    let upload_dir = temp_dir("schoold-uploads");
    let store = if store_available {
        Some(open_store(&data_dir).expect("open store"))
    } else {
        None
    };
    let state = Arc::new(AppState {
        config: Config {
            port: 0,
            data_dir,
            upload_dir,
        },
        store,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn upsert_inserts_then_updates_in_place() {
    let base = spawn_app_with(true).await;
    let client = reqwest::Client::new();

    let first: serde_json::Value = client
        .post(format!("{base}/api/attendance/set"))
        .json(&json!({ "student_id": "stu-1", "date": "2026-03-02", "status": "present" }))
        .send()
        .await
        .expect("first set")
        .json()
        .await
        .expect("parse first");
    assert_eq!(first.get("matched").and_then(|v| v.as_bool()), Some(false));
    let upserted = first
        .get("upserted_id")
        .and_then(|v| v.as_str())
        .expect("upserted_id");
    assert!(!upserted.is_empty());

    let second: serde_json::Value = client
        .post(format!("{base}/api/attendance/set"))
        .json(&json!({ "student_id": "stu-1", "date": "2026-03-02", "status": "absent" }))
        .send()
        .await
        .expect("second set")
        .json()
        .await
        .expect("parse second");
    assert_eq!(second.get("matched").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(second.get("modified").and_then(|v| v.as_bool()), Some(true));
    assert!(second.get("upserted_id").map(|v| v.is_null()).unwrap_or(false));

    let listed: serde_json::Value = client
        .get(format!("{base}/api/attendance?date_value=2026-03-02"))
        .send()
        .await
        .expect("get attendance")
        .json()
        .await
        .expect("parse list");
    let rows = listed.as_array().expect("array");
    assert_eq!(rows.len(), 1, "exactly one record per (student, date)");
    assert_eq!(
        rows[0].get("status").and_then(|v| v.as_str()),
        Some("absent")
    );
    assert_eq!(
        rows[0].get("student_id").and_then(|v| v.as_str()),
        Some("stu-1")
    );
}

#[tokio::test]
async fn repeating_the_same_status_reports_unmodified() {
    let base = spawn_app_with(true).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        client
            .post(format!("{base}/api/attendance/set"))
            .json(&json!({ "student_id": "stu-2", "date": "2026-03-05", "status": "late" }))
            .send()
            .await
            .expect("set");
    }
    let third: serde_json::Value = client
        .post(format!("{base}/api/attendance/set"))
        .json(&json!({ "student_id": "stu-2", "date": "2026-03-05", "status": "late" }))
        .send()
        .await
        .expect("third set")
        .json()
        .await
        .expect("parse");
    assert_eq!(third.get("matched").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(third.get("modified").and_then(|v| v.as_bool()), Some(false));
}

#[tokio::test]
async fn listing_requires_a_valid_date_value() {
    let base = spawn_app_with(true).await;
    let client = reqwest::Client::new();

    let missing = client
        .get(format!("{base}/api/attendance"))
        .send()
        .await
        .expect("get without date");
    assert_eq!(missing.status(), 400);

    let malformed = client
        .get(format!("{base}/api/attendance?date_value=03-02-2026"))
        .send()
        .await
        .expect("get with bad date");
    assert_eq!(malformed.status(), 400);
    let body: serde_json::Value = malformed.json().await.expect("parse error");
    assert_eq!(
        body.pointer("/error/code").and_then(|v| v.as_str()),
        Some("validation_failed")
    );
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_any_write() {
    let base = spawn_app_with(true).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/attendance/set"))
        .json(&json!({ "student_id": "stu-3", "date": "yesterday", "status": "" }))
        .send()
        .await
        .expect("set");
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.expect("parse error");
    let details = body
        .pointer("/error/details")
        .and_then(|v| v.as_array())
        .expect("details");
    let fields: Vec<&str> = details
        .iter()
        .filter_map(|d| d.get("field").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(fields, vec!["date", "status"]);
}

#[tokio::test]
async fn unavailable_store_fails_writes_and_empties_reads() {
    let base = spawn_app_with(false).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/attendance/set"))
        .json(&json!({ "student_id": "stu-1", "date": "2026-03-02", "status": "present" }))
        .send()
        .await
        .expect("set");
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.expect("parse error");
    assert_eq!(
        body.pointer("/error/code").and_then(|v| v.as_str()),
        Some("storage_unavailable")
    );

    // Reads degrade to empty lists rather than errors.
    let listed: serde_json::Value = client
        .get(format!("{base}/api/attendance?date_value=2026-03-02"))
        .send()
        .await
        .expect("get attendance")
        .json()
        .await
        .expect("parse list");
    assert!(listed.as_array().expect("array").is_empty());

    let students: serde_json::Value = client
        .get(format!("{base}/api/students"))
        .send()
        .await
        .expect("get students")
        .json()
        .await
        .expect("parse list");
    assert!(students.as_array().expect("array").is_empty());
}
