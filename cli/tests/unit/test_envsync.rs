//! Env-sync against a mocked Platform

use chrono::{DateTime, TimeZone, Utc};
use coolifyme::envsync::dotenv;
use coolifyme::envsync::{ApplicationEnv, EnvSync};
use coolifyme::errors::ClientError;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

use crate::common::{bearer, client_for};

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
}

fn remote_vars() -> serde_json::Value {
    json!([
        {"uuid": "e1", "key": "K1", "value": "v1", "is_preview": false},
        {"uuid": "e2", "key": "K2", "value": "old", "is_preview": false},
        {"uuid": "e3", "key": "K2", "value": "preview-only", "is_preview": true}
    ])
}

#[tokio::test]
async fn test_sync_reconciles_both_sides() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/applications/app1/envs")
                .header("Authorization", bearer());
            then.status(200).json_body(remote_vars());
        })
        .await;
    let bulk = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/v1/applications/app1/envs/bulk")
                .body_contains("\"K2\"")
                .body_contains("\"new\"")
                .body_contains("\"K3\"");
            then.status(201).json_body(json!({"message": "Environment variables updated."}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "K2=new\nK3=v3\n").unwrap();

    let engine =
        EnvSync::new(ApplicationEnv::new(client_for(&server), "app1")).with_clock(fixed_clock);
    let report = engine.sync(&path, false).await.unwrap();

    list.assert_async().await;
    bulk.assert_async().await;
    assert_eq!(report.plan.total_changes(), 4);
    assert!(report.plan.add_to_file.contains_key("K1"));

    let written = dotenv::parse(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(written.get("K1").map(String::as_str), Some("v1"));
    assert_eq!(written.get("K2").map(String::as_str), Some("new"));
    assert_eq!(written.get("K3").map(String::as_str), Some("v3"));
    assert_eq!(written.len(), 3);
}

#[tokio::test]
async fn test_sync_dry_run_sends_nothing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/applications/app1/envs");
            then.status(200).json_body(remote_vars());
        })
        .await;
    let bulk = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/api/v1/applications/app1/envs/bulk");
            then.status(201).json_body(json!({"message": "ok"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "K2=new\n").unwrap();

    let engine = EnvSync::new(ApplicationEnv::new(client_for(&server), "app1"));
    let report = engine.sync(&path, true).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.plan.update_in_remote.len(), 1);
    assert_eq!(bulk.hits_async().await, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "K2=new\n");
}

#[tokio::test]
async fn test_cleanup_with_backup() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/applications/app1/envs");
            then.status(200)
                .json_body(json!([{"uuid": "e1", "key": "K1", "value": "v1"}]));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    let original = "K1=local\nSTALE=1\n";
    std::fs::write(&path, original).unwrap();

    let engine =
        EnvSync::new(ApplicationEnv::new(client_for(&server), "app1")).with_clock(fixed_clock);
    let report = engine.cleanup(&path, true, false).await.unwrap();

    assert_eq!(report.removed, vec!["STALE".to_string()]);
    let backup = dir.path().join(".env.backup.20240301-123045");
    assert_eq!(report.backup.as_deref(), Some(backup.as_path()));
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);

    let cleaned = dotenv::parse(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(cleaned.len(), 1);
    // the local value is kept
    assert_eq!(cleaned.get("K1").map(String::as_str), Some("local"));
}

#[tokio::test]
async fn test_export_writes_remote_vars() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/services/svc1/envs");
            then.status(200).json_body(json!([
                {"uuid": "e1", "key": "MULTI", "value": "line1\nline2"},
                {"uuid": "e2", "key": "PLAIN", "value": "x"}
            ]));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("svc.env");
    let engine = EnvSync::new(coolifyme::envsync::ServiceEnv::new(client_for(&server), "svc1"));
    let report = engine.export(&path, false, false).await.unwrap();
    assert_eq!(report.count, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("# "));
    assert!(contents.contains("MULTI=\"line1\\nline2\""));
    let parsed = dotenv::parse(&contents);
    assert_eq!(parsed.get("MULTI").map(String::as_str), Some("line1\nline2"));

    let err = engine.export(&path, false, false).await.unwrap_err();
    assert!(matches!(err, ClientError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_remote_error_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/applications/missing/envs");
            then.status(404).json_body(json!({"message": "Application not found."}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    let engine = EnvSync::new(ApplicationEnv::new(client_for(&server), "missing"));
    let err = engine.sync(&path, false).await.unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert!(err.to_string().contains("Application not found."));
    assert!(!path.exists());
}
