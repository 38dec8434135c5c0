//! Resource selection and per-item actions for bulk commands

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::bulk::executor::{self, BulkReport};
use crate::deploy::controller::{DeployOptions, DeploymentController};
use crate::errors::ClientError;
use crate::http::client::HttpClient;

/// Action applied to every selected resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Start,
    Stop,
    Restart,
    Deploy,
}

/// Kind of resource a bulk command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Applications,
    Services,
}

/// A resource picked for a bulk run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub uuid: String,
    pub name: String,
}

/// Keep targets whose name contains `filter`, ignoring case
pub fn filter_targets(targets: Vec<Target>, filter: Option<&str>) -> Vec<Target> {
    let Some(filter) = filter.map(str::to_lowercase).filter(|f| !f.is_empty()) else {
        return targets;
    };
    targets
        .into_iter()
        .filter(|t| t.name.to_lowercase().contains(&filter))
        .collect()
}

/// List the resources of `kind`, restricted by an optional name filter
pub async fn select_targets(
    client: &HttpClient,
    kind: ResourceKind,
    filter: Option<&str>,
) -> Result<Vec<Target>, ClientError> {
    let targets: Vec<Target> = match kind {
        ResourceKind::Applications => client
            .list_applications()
            .await?
            .into_iter()
            .filter_map(|a| {
                Some(Target {
                    uuid: a.uuid?,
                    name: a.name.unwrap_or_default(),
                })
            })
            .collect(),
        ResourceKind::Services => client
            .list_services()
            .await?
            .into_iter()
            .filter_map(|s| {
                Some(Target {
                    uuid: s.uuid?,
                    name: s.name.unwrap_or_default(),
                })
            })
            .collect(),
    };
    Ok(filter_targets(targets, filter))
}

/// Apply `action` to one resource and return the Platform's message
pub async fn apply(
    client: &HttpClient,
    kind: ResourceKind,
    action: BulkAction,
    uuid: &str,
) -> Result<String, ClientError> {
    let message = match (kind, action) {
        (ResourceKind::Applications, BulkAction::Start) => {
            client.start_application(uuid, false, false).await?.message
        }
        (ResourceKind::Applications, BulkAction::Stop) => {
            client.stop_application(uuid).await?.message
        }
        (ResourceKind::Applications, BulkAction::Restart) => {
            client.restart_application(uuid).await?.message
        }
        (ResourceKind::Applications, BulkAction::Deploy) => {
            let references = DeploymentController::new(client.clone())
                .trigger(uuid, &DeployOptions::default())
                .await?;
            references.into_iter().next().map(|r| r.message)
        }
        (ResourceKind::Services, BulkAction::Start) => client.start_service(uuid).await?.message,
        (ResourceKind::Services, BulkAction::Stop) => client.stop_service(uuid).await?.message,
        (ResourceKind::Services, BulkAction::Restart) => {
            client.restart_service(uuid).await?.message
        }
        (ResourceKind::Services, BulkAction::Deploy) => {
            DeploymentController::new(client.clone())
                .deploy_service(uuid)
                .await?
                .message
        }
    };
    Ok(message.unwrap_or_else(|| "ok".to_string()))
}

/// Run `action` over `targets` with bounded concurrency
pub async fn run(
    client: &HttpClient,
    kind: ResourceKind,
    action: BulkAction,
    targets: &[Target],
    concurrency: usize,
    cancel: &CancellationToken,
) -> BulkReport<String> {
    let ids = targets.iter().map(|t| t.uuid.clone()).collect();
    let client = client.clone();
    executor::run(ids, concurrency, cancel, move |uuid| {
        let client = client.clone();
        async move { apply(&client, kind, action, &uuid).await }
    })
    .await
}
