//! API models

use serde::{Deserialize, Serialize};

/// Application resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Application {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub fqdn: Option<String>,
    pub status: Option<String>,
    pub git_repository: Option<String>,
    pub git_branch: Option<String>,
    pub build_pack: Option<String>,
    pub ports_exposes: Option<String>,
    pub docker_registry_image_name: Option<String>,
    pub docker_registry_image_tag: Option<String>,
    pub environment_id: Option<i64>,
    pub destination_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create an application from a public git repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePublicApplicationRequest {
    pub project_uuid: String,
    pub server_uuid: String,
    pub environment_name: String,
    pub git_repository: String,
    pub git_branch: String,
    pub build_pack: String,
    pub ports_exposes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Create an application from an inline Dockerfile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDockerfileApplicationRequest {
    pub project_uuid: String,
    pub server_uuid: String,
    pub environment_name: String,
    pub dockerfile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports_exposes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Create an application from a registry image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDockerImageApplicationRequest {
    pub project_uuid: String,
    pub server_uuid: String,
    pub environment_name: String,
    pub docker_registry_image_name: String,
    pub ports_exposes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_registry_image_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Partial application update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApplicationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports_exposes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Response for create calls that only echo the new identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UuidResponse {
    pub uuid: Option<String>,
    pub domains: Option<String>,
}

/// Generic `{ "message": ... }` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// Start/restart response carrying the queued deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    pub message: Option<String>,
    pub deployment_uuid: Option<String>,
}

/// Application logs response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationLogs {
    pub logs: Option<String>,
}

/// Environment variable as stored on the Platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub real_value: Option<String>,
    pub is_build_time: Option<bool>,
    pub is_literal: Option<bool>,
    pub is_multiline: Option<bool>,
    pub is_preview: Option<bool>,
    pub is_shown_once: Option<bool>,
    pub is_shared: Option<bool>,
    pub application_id: Option<i64>,
    pub service_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create or update a single environment variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariableRequest {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_build_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_literal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_multiline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shown_once: Option<bool>,
}

/// Bulk environment variable update body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEnvironmentVariablesRequest {
    pub data: Vec<EnvironmentVariableRequest>,
}

/// Service resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub environment_id: Option<i64>,
    pub server_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create a one-click or compose-based service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub project_uuid: String,
    pub server_uuid: String,
    pub environment_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_compose_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Partial service update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_compose_raw: Option<String>,
}

/// Per-engine database creation body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDatabaseRequest {
    pub server_uuid: String,
    pub project_uuid: String,
    pub environment_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}

/// Partial database update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDatabaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
}

/// Server resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ip: Option<String>,
    pub port: Option<i64>,
    pub user: Option<String>,
    pub is_reachable: Option<bool>,
    pub is_usable: Option<bool>,
    pub proxy_type: Option<String>,
}

/// Create or update a server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_build_server: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_validate: Option<bool>,
}

/// Project resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// Project environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub project_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create or update a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Team resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub personal_team: Option<bool>,
    #[serde(default)]
    pub members: Vec<User>,
}

/// Team member
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Private SSH key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivateKey {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub private_key: Option<String>,
    pub is_git_related: Option<bool>,
    pub team_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create or update a private key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivateKeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Generic resource entry returned by `/resources`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub status: Option<String>,
}

/// One queued deployment from a deploy trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployEntry {
    pub message: Option<String>,
    pub resource_uuid: Option<String>,
    pub deployment_uuid: Option<String>,
}

/// Deploy trigger response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployResponse {
    #[serde(default)]
    pub deployments: Vec<DeployEntry>,
}

/// Application deployment queue entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationDeploymentQueue {
    pub id: Option<i64>,
    pub application_id: Option<String>,
    pub deployment_uuid: Option<String>,
    pub pull_request_id: Option<i64>,
    pub force_rebuild: Option<bool>,
    pub commit: Option<String>,
    pub status: Option<String>,
    pub is_webhook: Option<bool>,
    pub is_api: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub logs: Option<String>,
    pub current_process_id: Option<String>,
    pub restart_only: Option<bool>,
    pub git_type: Option<String>,
    pub server_id: Option<i64>,
    pub application_name: Option<String>,
    pub server_name: Option<String>,
    pub deployment_url: Option<String>,
    pub destination_id: Option<String>,
    pub only_this_server: Option<bool>,
    pub rollback: Option<bool>,
    pub commit_message: Option<String>,
}

/// Paged per-application deployments response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationDeploymentsResponse {
    pub count: Option<i64>,
    #[serde(default)]
    pub deployments: Vec<ApplicationDeploymentQueue>,
}

/// Error response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
    pub errors: Option<serde_json::Value>,
}
