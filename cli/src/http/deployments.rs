//! Deployment API client

use openapi_client::{ApplicationDeploymentQueue, ApplicationDeploymentsResponse, DeployResponse};
use serde::Deserialize;

use crate::errors::{ClientError, ResultExt};
use crate::http::client::HttpClient;
use crate::utils::validate_uuid;

/// Query parameters of a deploy trigger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployQuery {
    /// Comma-joined resource identifiers
    pub uuids: String,
    pub force: bool,
    pub tag: Option<String>,
    pub pr: Option<u64>,
}

/// Per-application listing comes back either paged or as a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum DeploymentList {
    Paged(ApplicationDeploymentsResponse),
    Plain(Vec<ApplicationDeploymentQueue>),
}

impl HttpClient {
    /// Trigger deployments for one or more resources
    pub async fn deploy(&self, query: &DeployQuery) -> Result<DeployResponse, ClientError> {
        let mut params = vec![("uuid", query.uuids.clone())];
        if query.force {
            params.push(("force", "true".to_string()));
        }
        if let Some(tag) = &query.tag {
            params.push(("tag", tag.clone()));
        }
        if let Some(pr) = query.pr {
            params.push(("pr", pr.to_string()));
        }
        self.get("/deploy", &params).await.context("trigger deployment")
    }

    /// Get a single deployment
    pub async fn get_deployment(
        &self,
        deployment_uuid: &str,
    ) -> Result<ApplicationDeploymentQueue, ClientError> {
        validate_uuid(deployment_uuid).context("get deployment")?;
        self.get(&format!("/deployments/{}", deployment_uuid), &[])
            .await
            .context("get deployment")
    }

    /// List deployments of an application; `skip` and `take` are sent only when positive
    pub async fn list_application_deployments(
        &self,
        app_uuid: &str,
        skip: Option<u32>,
        take: Option<u32>,
    ) -> Result<Vec<ApplicationDeploymentQueue>, ClientError> {
        validate_uuid(app_uuid).context("list application deployments")?;
        let mut query = Vec::new();
        if let Some(skip) = skip.filter(|s| *s > 0) {
            query.push(("skip", skip.to_string()));
        }
        if let Some(take) = take.filter(|t| *t > 0) {
            query.push(("take", take.to_string()));
        }
        let list: DeploymentList = self
            .get(&format!("/deployments/applications/{}", app_uuid), &query)
            .await
            .context("list application deployments")?;
        Ok(match list {
            DeploymentList::Paged(page) => page.deployments,
            DeploymentList::Plain(deployments) => deployments,
        })
    }

    /// List running deployments across the team
    pub async fn list_deployments(&self) -> Result<Vec<ApplicationDeploymentQueue>, ClientError> {
        self.get("/deployments", &[])
            .await
            .context("list deployments")
    }
}
