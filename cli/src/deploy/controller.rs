//! Deployment controller: triggers, lookups and watching

use openapi_client::{ActionResponse, ApplicationDeploymentQueue, DeployEntry};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::deploy::watch::{self, WatchOptions};
use crate::errors::{ClientError, ResultExt};
use crate::http::client::HttpClient;
use crate::http::deployments::DeployQuery;
use crate::utils::validate_uuid;

/// Options of a deploy trigger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Rebuild without cache
    pub force: bool,

    /// Deploy a tag or branch; sent as the `tag` query parameter
    pub branch: Option<String>,

    /// Deploy a pull request preview
    pub pr: Option<u64>,
}

impl DeployOptions {
    /// `branch` and `pr` are mutually exclusive
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.branch.is_some() && self.pr.is_some() {
            return Err(ClientError::InvalidArgument(
                "branch and pr cannot be used together".into(),
            ));
        }
        if matches!(&self.branch, Some(b) if b.trim().is_empty()) {
            return Err(ClientError::InvalidArgument("branch must not be empty".into()));
        }
        Ok(())
    }
}

/// A queued deployment returned by a trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReference {
    pub resource_uuid: String,
    pub deployment_uuid: String,
    pub message: String,
}

impl From<DeployEntry> for DeploymentReference {
    fn from(entry: DeployEntry) -> Self {
        Self {
            resource_uuid: entry.resource_uuid.unwrap_or_default(),
            deployment_uuid: entry.deployment_uuid.unwrap_or_default(),
            message: entry.message.unwrap_or_default(),
        }
    }
}

/// Snapshot of a deployment as reported by the Platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub id: i64,
    pub deployment_uuid: String,
    pub application_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_rebuild: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_webhook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_api: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_id: Option<i64>,
}

impl From<ApplicationDeploymentQueue> for DeploymentStatus {
    fn from(q: ApplicationDeploymentQueue) -> Self {
        Self {
            id: q.id.unwrap_or_default(),
            deployment_uuid: q.deployment_uuid.unwrap_or_default(),
            application_id: q.application_id.unwrap_or_default(),
            status: q.status.unwrap_or_default(),
            created_at: q.created_at.unwrap_or_default(),
            updated_at: q.updated_at.unwrap_or_default(),
            commit: q.commit,
            commit_message: q.commit_message,
            server_name: q.server_name,
            logs: q.logs,
            force_rebuild: q.force_rebuild,
            is_webhook: q.is_webhook,
            is_api: q.is_api,
            // zero means "not a preview"
            pull_request_id: q.pull_request_id.filter(|id| *id > 0),
        }
    }
}

/// Deployment controller
#[derive(Debug, Clone)]
pub struct DeploymentController {
    client: HttpClient,
    watch_options: WatchOptions,
}

impl DeploymentController {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            watch_options: WatchOptions::default(),
        }
    }

    /// Override the watch cadence
    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }

    /// Trigger a deployment of one resource
    pub async fn trigger(
        &self,
        uuid: &str,
        options: &DeployOptions,
    ) -> Result<Vec<DeploymentReference>, ClientError> {
        self.trigger_multiple(&[uuid.to_string()], options).await
    }

    /// Trigger deployments of several resources in one call.
    ///
    /// References come back in the order the Platform reports them.
    pub async fn trigger_multiple(
        &self,
        uuids: &[String],
        options: &DeployOptions,
    ) -> Result<Vec<DeploymentReference>, ClientError> {
        options.validate().context("trigger deployment")?;
        if uuids.is_empty() {
            return Err(ClientError::InvalidArgument("no resource uuid given".into())
                .context("trigger deployment"));
        }
        for uuid in uuids {
            validate_uuid(uuid).context("trigger deployment")?;
        }

        let query = DeployQuery {
            uuids: uuids.join(","),
            force: options.force,
            tag: options.branch.clone(),
            pr: options.pr,
        };
        let response = self.client.deploy(&query).await?;
        if response.deployments.is_empty() {
            return Err(ClientError::EmptyResponse(
                "the Platform queued no deployments".into(),
            )
            .context("trigger deployment"));
        }

        let references: Vec<DeploymentReference> = response
            .deployments
            .into_iter()
            .map(DeploymentReference::from)
            .collect();
        info!(count = references.len(), "deployments queued");
        Ok(references)
    }

    /// Deploy a service; the Platform has no separate deploy endpoint for services
    pub async fn deploy_service(&self, uuid: &str) -> Result<ActionResponse, ClientError> {
        self.client.start_service(uuid).await
    }

    /// Fetch a deployment snapshot
    pub async fn get(&self, deployment_uuid: &str) -> Result<DeploymentStatus, ClientError> {
        self.client
            .get_deployment(deployment_uuid)
            .await
            .map(DeploymentStatus::from)
    }

    /// Paged deployments of an application
    pub async fn list_for_app(
        &self,
        app_uuid: &str,
        skip: Option<u32>,
        take: Option<u32>,
    ) -> Result<Vec<DeploymentStatus>, ClientError> {
        let deployments = self
            .client
            .list_application_deployments(app_uuid, skip, take)
            .await?;
        Ok(deployments.into_iter().map(DeploymentStatus::from).collect())
    }

    /// Running deployments across the team
    pub async fn list_all(&self) -> Result<Vec<DeploymentStatus>, ClientError> {
        let deployments = self.client.list_deployments().await?;
        Ok(deployments.into_iter().map(DeploymentStatus::from).collect())
    }

    /// Poll a deployment until it finishes
    pub async fn watch(
        &self,
        deployment_uuid: &str,
        cancel: &CancellationToken,
    ) -> Result<DeploymentStatus, ClientError> {
        validate_uuid(deployment_uuid).context("watch deployment")?;
        watch::watch(
            &self.watch_options,
            cancel,
            move || self.get(deployment_uuid),
            tokio::time::sleep,
        )
        .await
    }
}
