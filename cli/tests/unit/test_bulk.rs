//! Bulk actions against a mocked Platform

use coolifyme::bulk::actions::{self, BulkAction, ResourceKind};
use coolifyme::errors::ClientError;
use httpmock::prelude::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::common::client_for;

#[tokio::test]
async fn test_select_targets_by_name() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/applications");
            then.status(200).json_body(json!([
                {"uuid": "a1", "name": "web-frontend"},
                {"uuid": "a2", "name": "Web-API"},
                {"uuid": "a3", "name": "worker"},
                {"name": "no-uuid-web"}
            ]));
        })
        .await;

    let client = client_for(&server);
    let targets = actions::select_targets(&client, ResourceKind::Applications, Some("web"))
        .await
        .unwrap();
    let uuids: Vec<&str> = targets.iter().map(|t| t.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_partial_failure_is_reported_per_item() {
    let server = MockServer::start_async().await;
    let ok = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/applications/a1/stop");
            then.status(200)
                .json_body(json!({"message": "Application stopping request queued."}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/applications/a2/stop");
            then.status(404).json_body(json!({"message": "Application not found."}));
        })
        .await;

    let client = client_for(&server);
    let targets = vec![
        actions::Target {
            uuid: "a1".into(),
            name: "one".into(),
        },
        actions::Target {
            uuid: "a2".into(),
            name: "two".into(),
        },
    ];
    let report = actions::run(
        &client,
        ResourceKind::Applications,
        BulkAction::Stop,
        &targets,
        5,
        &CancellationToken::new(),
    )
    .await;

    ok.assert_async().await;
    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.summary(), "1/2 operations completed successfully");

    let failures: Vec<(&str, &ClientError)> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "a2");
    assert_eq!(failures[0].1.status(), Some(reqwest::StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_service_deploy_uses_start_endpoint() {
    let server = MockServer::start_async().await;
    let start = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/services/s1/start");
            then.status(200)
                .json_body(json!({"message": "Service starting request queued."}));
        })
        .await;

    let client = client_for(&server);
    let message = actions::apply(&client, ResourceKind::Services, BulkAction::Deploy, "s1")
        .await
        .unwrap();

    start.assert_async().await;
    assert_eq!(message, "Service starting request queued.");
}
