//! Authenticated, traced HTTP transport

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Request, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ClientError;

/// Bodies at or above this size are never buffered for logging
pub const MAX_LOGGED_BODY: usize = 10 * 1024;

const REDACTED: &str = "[REDACTED]";

/// Something that can send a fully built request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, ClientError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

/// Injects bearer credentials and JSON headers, and traces every exchange
pub struct AuthTransport<T> {
    inner: T,
    authorization: HeaderValue,
}

impl<T: Transport> AuthTransport<T> {
    /// Wrap `inner`, authenticating every request with `token`
    pub fn new(inner: T, token: &SecretString) -> Result<Self, ClientError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).map_err(|_| {
                ClientError::Config("API token contains characters not allowed in a header".into())
            })?;
        authorization.set_sensitive(true);
        Ok(Self {
            inner,
            authorization,
        })
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthTransport<T> {
    async fn execute(&self, mut request: Request) -> Result<Response, ClientError> {
        let headers = request.headers_mut();
        headers
            .entry(AUTHORIZATION)
            .or_insert_with(|| self.authorization.clone());
        headers
            .entry(ACCEPT)
            .or_insert_with(|| HeaderValue::from_static("application/json"));
        headers
            .entry(CONTENT_TYPE)
            .or_insert_with(|| HeaderValue::from_static("application/json"));

        let method = request.method().clone();
        let url = request.url().clone();
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .filter(|b| b.len() < MAX_LOGGED_BODY)
            .map(redact_body);
        debug!(
            %method,
            %url,
            headers = ?redact_headers(request.headers()),
            body = body.as_deref().unwrap_or_default(),
            "request"
        );

        let started = Instant::now();
        let response = match self.inner.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    %method,
                    %url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "request-failed"
                );
                return Err(e);
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let small = response
            .content_length()
            .is_some_and(|len| (len as usize) < MAX_LOGGED_BODY);
        if !small {
            debug!(
                %method,
                %url,
                status = response.status().as_u16(),
                headers = ?redact_headers(response.headers()),
                elapsed_ms,
                "response"
            );
            return Ok(response);
        }

        let (response, bytes) = buffer_response(response).await?;
        debug!(
            %method,
            %url,
            status = response.status().as_u16(),
            headers = ?redact_headers(response.headers()),
            body = %redact_body(&bytes),
            elapsed_ms,
            "response"
        );
        Ok(response)
    }
}

/// Read the body and hand back an equivalent response for the caller.
///
/// The rebuilt response keeps status, version and headers; its URL is a
/// placeholder.
async fn buffer_response(response: Response) -> Result<(Response, Vec<u8>), ClientError> {
    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();
    let bytes = response.bytes().await?.to_vec();

    let mut rebuilt = http::Response::new(bytes.clone());
    *rebuilt.status_mut() = status;
    *rebuilt.version_mut() = version;
    *rebuilt.headers_mut() = headers;
    Ok((Response::from(rebuilt), bytes))
}

/// Headers as printable pairs with credentials masked
pub fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if is_sensitive_header(name) {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

fn is_sensitive_header(name: &HeaderName) -> bool {
    let name = name.as_str();
    name == AUTHORIZATION.as_str()
        || name == "proxy-authorization"
        || name == "cookie"
        || name == "set-cookie"
        || is_sensitive_key(name)
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ["token", "secret", "password", "private_key", "api_key", "apikey"]
        .iter()
        .any(|needle| key.contains(needle))
}

/// Body as text with token-like JSON fields masked
pub fn redact_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(mut value) => {
            redact_value(&mut value);
            value.to_string()
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if is_sensitive_key(key) && !v.is_null() {
                    *v = Value::String(REDACTED.to_string());
                } else {
                    redact_value(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}
