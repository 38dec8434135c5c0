//! Deployment triggering and status lookups

use coolifyme::deploy::{DeployOptions, DeploymentController};
use coolifyme::errors::ClientError;
use httpmock::prelude::*;
use serde_json::json;

use crate::common::{bearer, client_for};

#[tokio::test]
async fn test_trigger_multiple_joins_uuids() {
    let server = MockServer::start_async().await;
    let deploy = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/deploy")
                .header("Authorization", bearer())
                .query_param("uuid", "app1,app2")
                .query_param("force", "true");
            then.status(200).json_body(json!({
                "deployments": [
                    {"message": "Application app1 deployment queued.", "resource_uuid": "app1", "deployment_uuid": "dep1"},
                    {"message": "Application app2 deployment queued.", "resource_uuid": "app2", "deployment_uuid": "dep2"}
                ]
            }));
        })
        .await;

    let controller = DeploymentController::new(client_for(&server));
    let options = DeployOptions {
        force: true,
        ..Default::default()
    };
    let refs = controller
        .trigger_multiple(&["app1".to_string(), "app2".to_string()], &options)
        .await
        .unwrap();

    deploy.assert_async().await;
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].resource_uuid, "app1");
    assert_eq!(refs[0].deployment_uuid, "dep1");
    assert_eq!(refs[1].deployment_uuid, "dep2");
}

#[tokio::test]
async fn test_branch_is_sent_as_tag() {
    let server = MockServer::start_async().await;
    let deploy = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/deploy")
                .query_param("uuid", "app1")
                .query_param("tag", "release-1");
            then.status(200).json_body(json!({
                "deployments": [{"resource_uuid": "app1", "deployment_uuid": "dep1"}]
            }));
        })
        .await;

    let controller = DeploymentController::new(client_for(&server));
    let options = DeployOptions {
        branch: Some("release-1".into()),
        ..Default::default()
    };
    let refs = controller.trigger("app1", &options).await.unwrap();

    deploy.assert_async().await;
    assert_eq!(refs[0].message, "");
}

#[tokio::test]
async fn test_branch_and_pr_are_rejected_before_any_request() {
    let server = MockServer::start_async().await;
    let deploy = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/deploy");
            then.status(200).json_body(json!({"deployments": []}));
        })
        .await;

    let controller = DeploymentController::new(client_for(&server));
    let options = DeployOptions {
        branch: Some("main".into()),
        pr: Some(7),
        ..Default::default()
    };
    let err = controller.trigger("app1", &options).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(deploy.hits_async().await, 0);
}

#[tokio::test]
async fn test_empty_deployment_list_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/deploy");
            then.status(200).json_body(json!({"deployments": []}));
        })
        .await;

    let controller = DeploymentController::new(client_for(&server));
    let err = controller
        .trigger("app1", &DeployOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::EmptyResponse(_)));
}

#[tokio::test]
async fn test_get_and_list_deployments() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/deployments/dep1");
            then.status(200).json_body(json!({
                "id": 3,
                "deployment_uuid": "dep1",
                "status": "in_progress",
                "commit": "abc123",
                "pull_request_id": 0
            }));
        })
        .await;
    let paged = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/deployments/applications/app1")
                .query_param("take", "2");
            then.status(200).json_body(json!({
                "count": 2,
                "deployments": [
                    {"deployment_uuid": "dep2", "status": "finished"},
                    {"deployment_uuid": "dep1", "status": "in_progress"}
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/deployments");
            then.status(200)
                .json_body(json!([{"deployment_uuid": "dep1", "status": "queued"}]));
        })
        .await;

    let controller = DeploymentController::new(client_for(&server));

    let status = controller.get("dep1").await.unwrap();
    assert_eq!(status.deployment_uuid, "dep1");
    assert_eq!(status.status, "in_progress");
    assert_eq!(status.commit.as_deref(), Some("abc123"));
    assert_eq!(status.pull_request_id, None);

    let listed = controller.list_for_app("app1", Some(0), Some(2)).await.unwrap();
    paged.assert_async().await;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].status, "finished");

    let running = controller.list_all().await.unwrap();
    assert_eq!(running.len(), 1);
}

#[tokio::test]
async fn test_malformed_uuid_is_rejected_locally() {
    let server = MockServer::start_async().await;
    let controller = DeploymentController::new(client_for(&server));
    let err = controller.get("../etc").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
}
