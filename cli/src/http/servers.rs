//! Server API client.
//!
//! Resource and domain listings are surfaced verbatim.

use openapi_client::{MessageResponse, Server, ServerRequest, UuidResponse};
use reqwest::StatusCode;

use crate::errors::{ClientError, ResultExt};
use crate::http::applications::created_uuid;
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

impl HttpClient {
    /// List all servers
    pub async fn list_servers(&self) -> Result<Vec<Server>, ClientError> {
        self.get("/servers", &[]).await.context("list servers")
    }

    /// Get a single server
    pub async fn get_server(&self, uuid: &str) -> Result<Server, ClientError> {
        validate_uuid(uuid).context("get server")?;
        self.get(&format!("/servers/{}", uuid), &[])
            .await
            .context("get server")
    }

    /// Register a server
    pub async fn create_server(&self, request: &ServerRequest) -> Result<String, ClientError> {
        let missing = [
            ("name", request.name.is_none()),
            ("ip", request.ip.is_none()),
            ("private_key_uuid", request.private_key_uuid.is_none()),
        ];
        if let Some((field, _)) = missing.iter().find(|(_, absent)| *absent) {
            return Err(ClientError::InvalidArgument(format!("{} is required", field))
                .context("create server"));
        }
        let response: UuidResponse = self
            .post("/servers", request, StatusCode::CREATED)
            .await
            .context("create server")?;
        created_uuid(response).context("create server")
    }

    /// Update a server
    pub async fn update_server(
        &self,
        uuid: &str,
        request: &ServerRequest,
    ) -> Result<UuidResponse, ClientError> {
        validate_uuid(uuid).context("update server")?;
        self.patch(&format!("/servers/{}", uuid), request, StatusCode::CREATED)
            .await
            .context("update server")
    }

    /// Delete a server
    pub async fn delete_server(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete server")?;
        self.delete(&format!("/servers/{}", uuid), &[])
            .await
            .context("delete server")
    }

    /// Ask the Platform to validate connectivity to a server
    pub async fn validate_server(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("validate server")?;
        self.get(&format!("/servers/{}/validate", uuid), &[])
            .await
            .context("validate server")
    }

    /// Resources running on a server (raw response body)
    pub async fn server_resources(&self, uuid: &str) -> Result<String, ClientError> {
        validate_uuid(uuid).context("get server resources")?;
        self.get_text(&format!("/servers/{}/resources", uuid), &[])
            .await
            .context("get server resources")
    }

    /// Domains routed to a server (raw response body)
    pub async fn server_domains(&self, uuid: &str) -> Result<String, ClientError> {
        validate_uuid(uuid).context("get server domains")?;
        self.get_text(&format!("/servers/{}/domains", uuid), &[])
            .await
            .context("get server domains")
    }
}
