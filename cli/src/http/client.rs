//! HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::EffectiveConfig;
use crate::errors::ClientError;
use crate::http::transport::{AuthTransport, Transport};

/// TCP connect timeout; request deadlines come from the retry policy
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Query string pairs
pub type Query<'a> = &'a [(&'a str, String)];

/// HTTP client for Platform communication
#[derive(Clone)]
pub struct HttpClient {
    builder: reqwest::Client,
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client from the effective configuration.
    ///
    /// Fails with a configuration error when no API token was resolved.
    pub fn new(config: &EffectiveConfig) -> Result<Self, ClientError> {
        let token = config.require_token()?;
        let base = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("coolifyme/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let transport = AuthTransport::new(base.clone(), token)?;
        Ok(Self::with_transport(&config.base_url, base, Arc::new(transport)))
    }

    /// Create a client over an explicit transport
    pub fn with_transport(
        base_url: &str,
        builder: reqwest::Client,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            builder,
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.builder.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        self.transport.execute(request.build()?).await
    }

    /// Make a GET request expecting `200` and a JSON body
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        decode_json(response, StatusCode::OK).await
    }

    /// Make a GET request expecting `200` and return the body verbatim
    pub async fn get_text(&self, path: &str, query: Query<'_>) -> Result<String, ClientError> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        decode_text(response, StatusCode::OK).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        decode_json(response, expected).await
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::PATCH, path, &[], Some(body)).await?;
        decode_json(response, expected).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::DELETE, path, query, None).await?;
        decode_json(response, StatusCode::OK).await
    }
}

async fn check_status(response: Response, expected: StatusCode) -> Result<Response, ClientError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::remote(status, error_message(&body)))
}

/// Prefer the Platform's `message` field over the raw error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<openapi_client::ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string())
}

async fn decode_json<T: DeserializeOwned>(
    response: Response,
    expected: StatusCode,
) -> Result<T, ClientError> {
    let response = check_status(response, expected).await?;
    let bytes = response.bytes().await?;
    let trimmed = String::from_utf8_lossy(&bytes);
    let trimmed = trimmed.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(ClientError::EmptyResponse(format!(
            "expected a response body for status {}",
            expected
        )));
    }
    Ok(serde_json::from_str(trimmed)?)
}

async fn decode_text(response: Response, expected: StatusCode) -> Result<String, ClientError> {
    let response = check_status(response, expected).await?;
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Err(ClientError::EmptyResponse(format!(
            "expected a response body for status {}",
            expected
        )));
    }
    Ok(text)
}
