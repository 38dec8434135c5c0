//! Error types for the coolifyme client

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the coolifyme client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("{context}API returned {status}: {body}")]
    Remote {
        context: String,
        status: StatusCode,
        body: String,
    },

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deployment {status}: {logs}")]
    DeploymentFailed { status: String, logs: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ClientError {
    /// Build a remote error from a non-success status line and body
    pub fn remote(status: StatusCode, body: impl Into<String>) -> Self {
        ClientError::Remote {
            context: String::new(),
            status,
            body: body.into(),
        }
    }

    /// Whether a retry wrapper may reattempt the failed operation
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout(_) => true,
            ClientError::Remote { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::REQUEST_TIMEOUT
            }
            _ => false,
        }
    }

    /// Prefix the error with a short description of the failed step.
    ///
    /// The variant is kept so callers can still match on it.
    pub fn context(self, what: &str) -> Self {
        match self {
            ClientError::InvalidArgument(m) => {
                ClientError::InvalidArgument(format!("failed to {what}: {m}"))
            }
            ClientError::Config(m) => ClientError::Config(format!("failed to {what}: {m}")),
            ClientError::NotFound(m) => ClientError::NotFound(format!("failed to {what}: {m}")),
            ClientError::AlreadyExists(m) => {
                ClientError::AlreadyExists(format!("failed to {what}: {m}"))
            }
            ClientError::EmptyResponse(m) => {
                ClientError::EmptyResponse(format!("failed to {what}: {m}"))
            }
            ClientError::Remote {
                context,
                status,
                body,
            } => ClientError::Remote {
                context: format!("failed to {what}: {context}"),
                status,
                body,
            },
            other => other,
        }
    }

    /// HTTP status of a remote error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Attach a "failed to X" prefix to the error side of a result
pub trait ResultExt<T> {
    fn context(self, what: &str) -> Result<T, ClientError>;
}

impl<T> ResultExt<T> for Result<T, ClientError> {
    fn context(self, what: &str) -> Result<T, ClientError> {
        self.map_err(|e| e.context(what))
    }
}
