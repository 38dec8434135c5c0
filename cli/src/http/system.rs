//! System API client

use openapi_client::MessageResponse;

use crate::errors::{ClientError, ResultExt};
use crate::http::client::HttpClient;

impl HttpClient {
    /// Platform version string
    pub async fn version(&self) -> Result<String, ClientError> {
        let text = self.get_text("/version", &[]).await.context("get version")?;
        Ok(text.trim().trim_matches('"').to_string())
    }

    /// Platform health check; returns the plain-text status
    pub async fn healthcheck(&self) -> Result<String, ClientError> {
        let text = self
            .get_text("/health", &[])
            .await
            .context("check health")?;
        Ok(text.trim().to_string())
    }

    /// Enable the Platform API
    pub async fn enable_api(&self) -> Result<MessageResponse, ClientError> {
        self.get("/enable", &[]).await.context("enable API")
    }

    /// Disable the Platform API
    pub async fn disable_api(&self) -> Result<MessageResponse, ClientError> {
        self.get("/disable", &[]).await.context("disable API")
    }
}
