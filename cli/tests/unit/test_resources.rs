//! Resource clients against a mocked Platform

use coolifyme::errors::ClientError;
use coolifyme::http::databases::DatabaseEngine;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use openapi_client::{
    CreateDatabaseRequest, CreatePublicApplicationRequest, PrivateKeyRequest, ServerRequest,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use crate::common::{bearer, client_for};

#[tokio::test]
async fn test_list_applications_sends_token() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/applications")
                .header("Authorization", bearer())
                .header("Accept", "application/json");
            then.status(200).json_body(json!([
                {"uuid": "a1", "name": "web", "status": "running:healthy", "unknown_field": 1}
            ]));
        })
        .await;

    let apps = client_for(&server).list_applications().await.unwrap();
    list.assert_async().await;
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name.as_deref(), Some("web"));
}

#[tokio::test]
async fn test_create_application_returns_uuid() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/applications/public")
                .json_body_partial(r#"{"git_repository": "https://github.com/coollabsio/coolify-examples", "build_pack": "nixpacks"}"#);
            then.status(201).json_body(json!({"uuid": "new1", "domains": "http://new1.example.com"}));
        })
        .await;

    let request = CreatePublicApplicationRequest {
        project_uuid: "p1".into(),
        server_uuid: "s1".into(),
        environment_name: "production".into(),
        git_repository: "https://github.com/coollabsio/coolify-examples".into(),
        git_branch: "main".into(),
        build_pack: "nixpacks".into(),
        ports_exposes: "3000".into(),
        ..Default::default()
    };
    let uuid = client_for(&server)
        .create_public_application(&request)
        .await
        .unwrap();

    create.assert_async().await;
    assert_eq!(uuid, "new1");
}

#[tokio::test]
async fn test_unexpected_status_is_a_remote_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/databases/postgresql");
            then.status(200).json_body(json!({"uuid": "db1"}));
        })
        .await;

    let request = CreateDatabaseRequest {
        server_uuid: "s1".into(),
        project_uuid: "p1".into(),
        environment_name: "production".into(),
        ..Default::default()
    };
    let err = client_for(&server)
        .create_database(DatabaseEngine::Postgresql, &request)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::OK));
}

#[tokio::test]
async fn test_missing_required_fields_skip_the_request() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.path_contains("/api/v1");
            then.status(500);
        })
        .await;
    let client = client_for(&server);

    let err = assert_err!(
        client
            .create_server(&ServerRequest {
                name: Some("edge".into()),
                ..Default::default()
            })
            .await
    );
    assert!(matches!(err, ClientError::InvalidArgument(_)));

    let err = assert_err!(
        client
            .create_private_key(&PrivateKeyRequest {
                name: Some("deploy".into()),
                ..Default::default()
            })
            .await
    );
    assert!(matches!(err, ClientError::InvalidArgument(_)));

    assert_eq!(any.hits_async().await, 0);
}

#[tokio::test]
async fn test_update_private_key_sends_uuid_in_body() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/v1/security/keys")
                .json_body_partial(r#"{"uuid": "key1", "name": "renamed"}"#);
            then.status(201).json_body(json!({"uuid": "key1"}));
        })
        .await;

    let request = PrivateKeyRequest {
        name: Some("renamed".into()),
        ..Default::default()
    };
    assert_ok!(client_for(&server).update_private_key("key1", &request).await);
    update.assert_async().await;
}

#[tokio::test]
async fn test_opaque_and_text_endpoints() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/version");
            then.status(200).body("\"4.0.0-beta.360\"\n");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/health");
            then.status(200).body("OK");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/databases");
            then.status(200).body(r#"[{"uuid":"db1","postgres_user":"app"}]"#);
        })
        .await;

    let client = client_for(&server);
    assert_eq!(client.version().await.unwrap(), "4.0.0-beta.360");
    assert_eq!(client.healthcheck().await.unwrap(), "OK");
    let raw = client.list_databases().await.unwrap();
    assert!(raw.contains("postgres_user"));
}

#[tokio::test]
async fn test_delete_database_forwards_volume_flag() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/v1/databases/db1")
                .query_param("delete_volumes", "true");
            then.status(200).json_body(json!({"message": "Database deletion request queued."}));
        })
        .await;

    let response = client_for(&server)
        .delete_database("db1", true)
        .await
        .unwrap();
    delete.assert_async().await;
    assert_eq!(
        response.message.as_deref(),
        Some("Database deletion request queued.")
    );
}
