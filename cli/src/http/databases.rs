//! Database API client.
//!
//! List and get responses are surfaced verbatim; their schema varies by engine.

use openapi_client::{
    ActionResponse, CreateDatabaseRequest, MessageResponse, UpdateDatabaseRequest, UuidResponse,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ResultExt};
use crate::http::applications::{created_uuid, require_field};
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

/// Database engines with a dedicated create endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgresql,
    Mysql,
    Mariadb,
    Mongodb,
    Redis,
    Keydb,
    Clickhouse,
    Dragonfly,
}

impl DatabaseEngine {
    /// Path segment of the engine's create endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            DatabaseEngine::Postgresql => "postgresql",
            DatabaseEngine::Mysql => "mysql",
            DatabaseEngine::Mariadb => "mariadb",
            DatabaseEngine::Mongodb => "mongodb",
            DatabaseEngine::Redis => "redis",
            DatabaseEngine::Keydb => "keydb",
            DatabaseEngine::Clickhouse => "clickhouse",
            DatabaseEngine::Dragonfly => "dragonfly",
        }
    }
}

impl HttpClient {
    /// List all databases (raw response body)
    pub async fn list_databases(&self) -> Result<String, ClientError> {
        self.get_text("/databases", &[])
            .await
            .context("list databases")
    }

    /// Get a single database (raw response body)
    pub async fn get_database(&self, uuid: &str) -> Result<String, ClientError> {
        validate_uuid(uuid).context("get database")?;
        self.get_text(&format!("/databases/{}", uuid), &[])
            .await
            .context("get database")
    }

    /// Create a database of the given engine
    pub async fn create_database(
        &self,
        engine: DatabaseEngine,
        request: &CreateDatabaseRequest,
    ) -> Result<String, ClientError> {
        require_field("server_uuid", &request.server_uuid).context("create database")?;
        require_field("project_uuid", &request.project_uuid).context("create database")?;
        require_field("environment_name", &request.environment_name)
            .context("create database")?;
        let response: UuidResponse = self
            .post(
                &format!("/databases/{}", engine.path_segment()),
                request,
                StatusCode::CREATED,
            )
            .await
            .context("create database")?;
        created_uuid(response).context("create database")
    }

    /// Update a database
    pub async fn update_database(
        &self,
        uuid: &str,
        request: &UpdateDatabaseRequest,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("update database")?;
        self.patch(&format!("/databases/{}", uuid), request, StatusCode::OK)
            .await
            .context("update database")
    }

    /// Delete a database
    pub async fn delete_database(
        &self,
        uuid: &str,
        delete_volumes: bool,
    ) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("delete database")?;
        let query = [("delete_volumes", delete_volumes.to_string())];
        self.delete(&format!("/databases/{}", uuid), &query)
            .await
            .context("delete database")
    }

    /// Start a database
    pub async fn start_database(&self, uuid: &str) -> Result<ActionResponse, ClientError> {
        validate_uuid(uuid).context("start database")?;
        self.get(&format!("/databases/{}/start", uuid), &[])
            .await
            .context("start database")
    }

    /// Stop a database
    pub async fn stop_database(&self, uuid: &str) -> Result<MessageResponse, ClientError> {
        validate_uuid(uuid).context("stop database")?;
        self.get(&format!("/databases/{}/stop", uuid), &[])
            .await
            .context("stop database")
    }

    /// Restart a database
    pub async fn restart_database(&self, uuid: &str) -> Result<ActionResponse, ClientError> {
        validate_uuid(uuid).context("restart database")?;
        self.get(&format!("/databases/{}/restart", uuid), &[])
            .await
            .context("restart database")
    }
}
