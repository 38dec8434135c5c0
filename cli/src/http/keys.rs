//! Private key API client

use openapi_client::{MessageResponse, PrivateKey, PrivateKeyRequest, UuidResponse};
use reqwest::StatusCode;

use crate::errors::{ClientError, ResultExt};
use crate::http::applications::{created_uuid, require_field};
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

impl HttpClient {
    /// List private keys
    pub async fn list_private_keys(&self) -> Result<Vec<PrivateKey>, ClientError> {
        self.get("/security/keys", &[])
            .await
            .context("list private keys")
    }

    /// Get a single private key
    pub async fn get_private_key(&self, uuid: &str) -> Result<PrivateKey, ClientError> {
        validate_uuid(uuid).context("get private key")?;
        self.get(&format!("/security/keys/{}", uuid), &[])
            .await
            .context("get private key")
    }

    /// Upload a private key
    pub async fn create_private_key(
        &self,
        request: &PrivateKeyRequest,
    ) -> Result<String, ClientError> {
        require_field("private_key", request.private_key.as_deref().unwrap_or_default())
            .context("create private key")?;
        let response: UuidResponse = self
            .post("/security/keys", request, StatusCode::CREATED)
            .await
            .context("create private key")?;
        created_uuid(response).context("create private key")
    }

    /// Update a private key; the uuid travels in the body
    pub async fn update_private_key(
        &self,
        uuid: &str,
        request: &PrivateKeyRequest,
    ) -> Result<UuidResponse, ClientError> {
        validate_uuid(uuid).context("update private key")?;
        let request = PrivateKeyRequest {
            uuid: Some(uuid.to_string()),
            ..request.clone()
        };
        self.patch("/security/keys", &request, StatusCode::CREATED)
            .await
            .context("update private key")
    }

    /// Delete a private key
    pub async fn delete_private_key(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete private key")?;
        self.delete(&format!("/security/keys/{}", uuid), &[])
            .await
            .context("delete private key")
    }
}
