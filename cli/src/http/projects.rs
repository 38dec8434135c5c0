//! Project API client

use openapi_client::{Environment, MessageResponse, Project, ProjectRequest, UuidResponse};
use reqwest::StatusCode;

use crate::errors::{ClientError, ResultExt};
use crate::http::applications::created_uuid;
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

impl HttpClient {
    /// List all projects
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.get("/projects", &[]).await.context("list projects")
    }

    /// Get a single project
    pub async fn get_project(&self, uuid: &str) -> Result<Project, ClientError> {
        validate_uuid(uuid).context("get project")?;
        self.get(&format!("/projects/{}", uuid), &[])
            .await
            .context("get project")
    }

    /// Create a project
    pub async fn create_project(&self, request: &ProjectRequest) -> Result<String, ClientError> {
        if request.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(ClientError::InvalidArgument("name is required".into())
                .context("create project"));
        }
        let response: UuidResponse = self
            .post("/projects", request, StatusCode::CREATED)
            .await
            .context("create project")?;
        created_uuid(response).context("create project")
    }

    /// Update a project
    pub async fn update_project(
        &self,
        uuid: &str,
        request: &ProjectRequest,
    ) -> Result<UuidResponse, ClientError> {
        validate_uuid(uuid).context("update project")?;
        self.patch(&format!("/projects/{}", uuid), request, StatusCode::CREATED)
            .await
            .context("update project")
    }

    /// Delete a project
    pub async fn delete_project(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete project")?;
        self.delete(&format!("/projects/{}", uuid), &[])
            .await
            .context("delete project")
    }

    /// Get a named environment of a project
    pub async fn get_project_environment(
        &self,
        uuid: &str,
        environment: &str,
    ) -> Result<Environment, ClientError> {
        validate_uuid(uuid).context("get project environment")?;
        validate_uuid(environment).context("get project environment")?;
        self.get(&format!("/projects/{}/{}", uuid, environment), &[])
            .await
            .context("get project environment")
    }
}
