//! Application API client

use openapi_client::{
    ActionResponse, Application, ApplicationLogs, BulkEnvironmentVariablesRequest,
    CreateDockerImageApplicationRequest, CreateDockerfileApplicationRequest,
    CreatePublicApplicationRequest, EnvironmentVariable, EnvironmentVariableRequest,
    MessageResponse, UpdateApplicationRequest, UuidResponse,
};
use reqwest::StatusCode;

use crate::errors::{ClientError, ResultExt};
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

impl HttpClient {
    /// List all applications
    pub async fn list_applications(&self) -> Result<Vec<Application>, ClientError> {
        self.get("/applications", &[])
            .await
            .context("list applications")
    }

    /// Get a single application
    pub async fn get_application(&self, uuid: &str) -> Result<Application, ClientError> {
        validate_uuid(uuid).context("get application")?;
        self.get(&format!("/applications/{}", uuid), &[])
            .await
            .context("get application")
    }

    /// Create an application from a public git repository
    pub async fn create_public_application(
        &self,
        request: &CreatePublicApplicationRequest,
    ) -> Result<String, ClientError> {
        require_field("git_repository", &request.git_repository).context("create application")?;
        let response: UuidResponse = self
            .post("/applications/public", request, StatusCode::CREATED)
            .await
            .context("create application")?;
        created_uuid(response).context("create application")
    }

    /// Create an application from an inline Dockerfile
    pub async fn create_dockerfile_application(
        &self,
        request: &CreateDockerfileApplicationRequest,
    ) -> Result<String, ClientError> {
        require_field("dockerfile", &request.dockerfile).context("create application")?;
        let response: UuidResponse = self
            .post("/applications/dockerfile", request, StatusCode::CREATED)
            .await
            .context("create application")?;
        created_uuid(response).context("create application")
    }

    /// Create an application from a registry image
    pub async fn create_dockerimage_application(
        &self,
        request: &CreateDockerImageApplicationRequest,
    ) -> Result<String, ClientError> {
        require_field("docker_registry_image_name", &request.docker_registry_image_name)
            .context("create application")?;
        let response: UuidResponse = self
            .post("/applications/dockerimage", request, StatusCode::CREATED)
            .await
            .context("create application")?;
        created_uuid(response).context("create application")
    }

    /// Update an application
    pub async fn update_application(
        &self,
        uuid: &str,
        request: &UpdateApplicationRequest,
    ) -> Result<UuidResponse, ClientError> {
        validate_uuid(uuid).context("update application")?;
        self.patch(&format!("/applications/{}", uuid), request, StatusCode::OK)
            .await
            .context("update application")
    }

    /// Delete an application
    pub async fn delete_application(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete application")?;
        self.delete(&format!("/applications/{}", uuid), &[])
            .await
            .context("delete application")
    }

    /// Start (deploy) an application
    pub async fn start_application(
        &self,
        uuid: &str,
        force: bool,
        instant_deploy: bool,
    ) -> Result<ActionResponse, ClientError> {
        validate_uuid(uuid).context("start application")?;
        let mut query = Vec::new();
        if force {
            query.push(("force", "true".to_string()));
        }
        if instant_deploy {
            query.push(("instant_deploy", "true".to_string()));
        }
        self.get(&format!("/applications/{}/start", uuid), &query)
            .await
            .context("start application")
    }

    /// Stop an application
    pub async fn stop_application(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("stop application")?;
        self.get(&format!("/applications/{}/stop", uuid), &[])
            .await
            .context("stop application")
    }

    /// Restart an application
    pub async fn restart_application(&self, uuid: &str) -> Result<ActionResponse, ClientError> {
        validate_uuid(uuid).context("restart application")?;
        self.get(&format!("/applications/{}/restart", uuid), &[])
            .await
            .context("restart application")
    }

    /// Fetch the last `lines` log lines of a running application
    pub async fn application_logs(&self, uuid: &str, lines: u32) -> Result<String, ClientError> {
        validate_uuid(uuid).context("get application logs")?;
        let query = [("lines", lines.to_string())];
        let response: ApplicationLogs = self
            .get(&format!("/applications/{}/logs", uuid), &query)
            .await
            .context("get application logs")?;
        Ok(response.logs.unwrap_or_default())
    }

    /// List environment variables of an application
    pub async fn list_application_envs(
        &self,
        uuid: &str,
    ) -> Result<Vec<EnvironmentVariable>, ClientError> {
        validate_uuid(uuid).context("list application environment variables")?;
        self.get(&format!("/applications/{}/envs", uuid), &[])
            .await
            .context("list application environment variables")
    }

    /// Create an environment variable on an application
    pub async fn create_application_env(
        &self,
        uuid: &str,
        request: &EnvironmentVariableRequest,
    ) -> Result<String, ClientError> {
        validate_uuid(uuid).context("create application environment variable")?;
        require_field("key", &request.key).context("create application environment variable")?;
        let response: UuidResponse = self
            .post(&format!("/applications/{}/envs", uuid), request, StatusCode::CREATED)
            .await
            .context("create application environment variable")?;
        created_uuid(response).context("create application environment variable")
    }

    /// Update an environment variable on an application, matched by key
    pub async fn update_application_env(
        &self,
        uuid: &str,
        request: &EnvironmentVariableRequest,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("update application environment variable")?;
        require_field("key", &request.key).context("update application environment variable")?;
        self.patch(&format!("/applications/{}/envs", uuid), request, StatusCode::CREATED)
            .await
            .context("update application environment variable")
    }

    /// Upsert a set of environment variables in one call
    pub async fn bulk_update_application_envs(
        &self,
        uuid: &str,
        request: &BulkEnvironmentVariablesRequest,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("bulk update application environment variables")?;
        self.patch(
            &format!("/applications/{}/envs/bulk", uuid),
            request,
            StatusCode::CREATED,
        )
        .await
        .context("bulk update application environment variables")
    }

    /// Delete an environment variable from an application
    pub async fn delete_application_env(
        &self,
        uuid: &str,
        env_uuid: &str,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete application environment variable")?;
        validate_uuid(env_uuid).context("delete application environment variable")?;
        self.delete(&format!("/applications/{}/envs/{}", uuid, env_uuid), &[])
            .await
            .context("delete application environment variable")
    }
}

/// Reject an empty required request field before any HTTP call
pub(crate) fn require_field(name: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidArgument(format!("{} is required", name)));
    }
    Ok(())
}

/// Extract the identifier from a create response
pub(crate) fn created_uuid(response: UuidResponse) -> Result<String, ClientError> {
    response
        .uuid
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ClientError::EmptyResponse("response did not include a uuid".into()))
}
