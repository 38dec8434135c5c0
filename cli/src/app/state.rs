//! Per-invocation state shared by command handlers

use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::app::options::GlobalArgs;
use crate::config::{resolve, EffectiveConfig, EnvVars};
use crate::errors::ClientError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;
use crate::http::retry::{with_timeout, RetryPolicy};
use crate::output::{render, OutputFormat};
use crate::storage::ProfileStore;

/// Everything a command handler needs
pub struct AppState {
    pub config: EffectiveConfig,
    pub store: ProfileStore,
    pub cancel: CancellationToken,
    policy: RetryPolicy,
}

impl AppState {
    /// Resolve the effective configuration for this invocation
    pub async fn init(
        global: &GlobalArgs,
        env: &EnvVars,
        cancel: CancellationToken,
    ) -> Result<Self, ClientError> {
        let store = match &global.config {
            Some(path) => ProfileStore::new(File::new(path)),
            None => ProfileStore::at_default_location()?,
        };
        let doc = match store.load().await {
            Ok(doc) => Some(doc),
            Err(ClientError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        let config = resolve(doc.as_ref(), env, &global.overrides())?;
        debug!(
            profile = %config.profile_name,
            base_url = %config.base_url,
            "resolved configuration"
        );

        let policy = RetryPolicy {
            timeout: Duration::from_secs(global.timeout),
            retry_count: global.retries,
            ..Default::default()
        };
        policy.validate()?;

        if let Some(color) = config.color {
            colored::control::set_override(color);
        }

        Ok(Self {
            config,
            store,
            cancel,
            policy,
        })
    }

    /// Build an API client; fails when no token is configured
    pub fn client(&self) -> Result<HttpClient, ClientError> {
        HttpClient::new(&self.config)
    }

    /// Run a read operation with timeout and retries
    pub async fn read<T, F, Fut>(&self, operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        with_timeout(&self.policy, &self.cancel, operation).await
    }

    /// Run a mutating operation with a timeout but no retries
    pub async fn write<T, F, Fut>(&self, operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let policy = RetryPolicy {
            retry_count: 0,
            ..self.policy.clone()
        };
        with_timeout(&policy, &self.cancel, operation).await
    }

    pub fn format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// Print a value in the configured output format
    pub fn print<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), ClientError> {
        let rendered = render(value, self.format())?;
        println!("{}", rendered.trim_end());
        Ok(())
    }

    /// Print a human message, or the value itself in machine formats
    pub fn report<T: Serialize + ?Sized>(
        &self,
        message: &str,
        value: &T,
    ) -> Result<(), ClientError> {
        match self.format() {
            OutputFormat::Table => {
                println!("{} {}", "✓".green(), message);
                Ok(())
            }
            _ => self.print(value),
        }
    }

    /// Print a warning line to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "!".yellow(), message);
    }
}
