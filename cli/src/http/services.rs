//! Service API client

use openapi_client::{
    ActionResponse, BulkEnvironmentVariablesRequest, CreateServiceRequest, EnvironmentVariable,
    EnvironmentVariableRequest, MessageResponse, Service, UpdateServiceRequest, UuidResponse,
};
use reqwest::StatusCode;

use crate::errors::{ClientError, ResultExt};
use crate::http::applications::{created_uuid, require_field};
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

impl HttpClient {
    /// List all services
    pub async fn list_services(&self) -> Result<Vec<Service>, ClientError> {
        self.get("/services", &[]).await.context("list services")
    }

    /// Get a single service
    pub async fn get_service(&self, uuid: &str) -> Result<Service, ClientError> {
        validate_uuid(uuid).context("get service")?;
        self.get(&format!("/services/{}", uuid), &[])
            .await
            .context("get service")
    }

    /// Create a service
    pub async fn create_service(
        &self,
        request: &CreateServiceRequest,
    ) -> Result<String, ClientError> {
        if request.service_type.is_none() && request.docker_compose_raw.is_none() {
            return Err(ClientError::InvalidArgument(
                "either a service type or a docker compose file is required".into(),
            )
            .context("create service"));
        }
        require_field("project_uuid", &request.project_uuid).context("create service")?;
        require_field("server_uuid", &request.server_uuid).context("create service")?;
        let response: UuidResponse = self
            .post("/services", request, StatusCode::CREATED)
            .await
            .context("create service")?;
        created_uuid(response).context("create service")
    }

    /// Update a service
    pub async fn update_service(
        &self,
        uuid: &str,
        request: &UpdateServiceRequest,
    ) -> Result<UuidResponse, ClientError> {
        validate_uuid(uuid).context("update service")?;
        self.patch(&format!("/services/{}", uuid), request, StatusCode::OK)
            .await
            .context("update service")
    }

    /// Delete a service
    pub async fn delete_service(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete service")?;
        self.delete(&format!("/services/{}", uuid), &[])
            .await
            .context("delete service")
    }

    /// Start a service; the Platform treats this as a deploy
    pub async fn start_service(&self, uuid: &str) -> Result<ActionResponse, ClientError> {
        validate_uuid(uuid).context("start service")?;
        self.get(&format!("/services/{}/start", uuid), &[])
            .await
            .context("start service")
    }

    /// Stop a service
    pub async fn stop_service(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("stop service")?;
        self.get(&format!("/services/{}/stop", uuid), &[])
            .await
            .context("stop service")
    }

    /// Restart a service
    pub async fn restart_service(&self, uuid: &str) -> Result<ActionResponse, ClientError> {
        validate_uuid(uuid).context("restart service")?;
        self.get(&format!("/services/{}/restart", uuid), &[])
            .await
            .context("restart service")
    }

    /// List environment variables of a service
    pub async fn list_service_envs(
        &self,
        uuid: &str,
    ) -> Result<Vec<EnvironmentVariable>, ClientError> {
        validate_uuid(uuid).context("list service environment variables")?;
        self.get(&format!("/services/{}/envs", uuid), &[])
            .await
            .context("list service environment variables")
    }

    /// Create an environment variable on a service
    pub async fn create_service_env(
        &self,
        uuid: &str,
        request: &EnvironmentVariableRequest,
    ) -> Result<String, ClientError> {
        validate_uuid(uuid).context("create service environment variable")?;
        require_field("key", &request.key).context("create service environment variable")?;
        let response: UuidResponse = self
            .post(&format!("/services/{}/envs", uuid), request, StatusCode::CREATED)
            .await
            .context("create service environment variable")?;
        created_uuid(response).context("create service environment variable")
    }

    /// Update an environment variable on a service, matched by key
    pub async fn update_service_env(
        &self,
        uuid: &str,
        request: &EnvironmentVariableRequest,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("update service environment variable")?;
        require_field("key", &request.key).context("update service environment variable")?;
        self.patch(&format!("/services/{}/envs", uuid), request, StatusCode::CREATED)
            .await
            .context("update service environment variable")
    }

    /// Upsert a set of service environment variables in one call
    pub async fn bulk_update_service_envs(
        &self,
        uuid: &str,
        request: &BulkEnvironmentVariablesRequest,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("bulk update service environment variables")?;
        self.patch(
            &format!("/services/{}/envs/bulk", uuid),
            request,
            StatusCode::CREATED,
        )
        .await
        .context("bulk update service environment variables")
    }

    /// Delete an environment variable from a service
    pub async fn delete_service_env(
        &self,
        uuid: &str,
        env_uuid: &str,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete service environment variable")?;
        validate_uuid(env_uuid).context("delete service environment variable")?;
        self.delete(&format!("/services/{}/envs/{}", uuid, env_uuid), &[])
            .await
            .context("delete service environment variable")
    }
}
