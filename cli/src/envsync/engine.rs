//! Export, import, sync and cleanup between a `.env` file and the Platform

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openapi_client::{
    BulkEnvironmentVariablesRequest, EnvironmentVariable, EnvironmentVariableRequest,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::envsync::diff::SyncPlan;
use crate::envsync::dotenv::{self, EnvMap};
use crate::errors::{ClientError, ResultExt};
use crate::filesys::file::File;
use crate::http::client::HttpClient;

/// Timestamp suffix of cleanup backups
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// The Platform side of an env sync
#[async_trait]
pub trait RemoteEnv: Send + Sync {
    /// Human readable owner, used in file headers
    fn describe(&self) -> String;

    /// Current variables
    async fn fetch(&self) -> Result<Vec<EnvironmentVariable>, ClientError>;

    /// Upsert `vars` in one call
    async fn bulk_update(&self, vars: Vec<EnvironmentVariableRequest>) -> Result<(), ClientError>;
}

/// Variables of an application
#[derive(Debug, Clone)]
pub struct ApplicationEnv {
    client: HttpClient,
    uuid: String,
}

impl ApplicationEnv {
    pub fn new(client: HttpClient, uuid: impl Into<String>) -> Self {
        Self {
            client,
            uuid: uuid.into(),
        }
    }
}

#[async_trait]
impl RemoteEnv for ApplicationEnv {
    fn describe(&self) -> String {
        format!("application {}", self.uuid)
    }

    async fn fetch(&self) -> Result<Vec<EnvironmentVariable>, ClientError> {
        self.client.list_application_envs(&self.uuid).await
    }

    async fn bulk_update(&self, vars: Vec<EnvironmentVariableRequest>) -> Result<(), ClientError> {
        let request = BulkEnvironmentVariablesRequest { data: vars };
        self.client
            .bulk_update_application_envs(&self.uuid, &request)
            .await?;
        Ok(())
    }
}

/// Variables of a service
#[derive(Debug, Clone)]
pub struct ServiceEnv {
    client: HttpClient,
    uuid: String,
}

impl ServiceEnv {
    pub fn new(client: HttpClient, uuid: impl Into<String>) -> Self {
        Self {
            client,
            uuid: uuid.into(),
        }
    }
}

#[async_trait]
impl RemoteEnv for ServiceEnv {
    fn describe(&self) -> String {
        format!("service {}", self.uuid)
    }

    async fn fetch(&self) -> Result<Vec<EnvironmentVariable>, ClientError> {
        self.client.list_service_envs(&self.uuid).await
    }

    async fn bulk_update(&self, vars: Vec<EnvironmentVariableRequest>) -> Result<(), ClientError> {
        let request = BulkEnvironmentVariablesRequest { data: vars };
        self.client.bulk_update_service_envs(&self.uuid, &request).await?;
        Ok(())
    }
}

/// Outcome of an export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub count: usize,
    pub dry_run: bool,
}

/// Outcome of an import
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub path: PathBuf,
    pub variables: EnvMap,
    pub dry_run: bool,
}

/// Outcome of a sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub path: PathBuf,
    pub plan: SyncPlan,
    pub dry_run: bool,
}

/// Outcome of a cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub path: PathBuf,
    pub removed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
}

/// Env-sync engine over one remote variable set
pub struct EnvSync<R: RemoteEnv> {
    remote: R,
    now: fn() -> DateTime<Utc>,
}

impl<R: RemoteEnv> EnvSync<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            now: Utc::now,
        }
    }

    /// Replace the clock used for headers and backup names
    pub fn with_clock(mut self, now: fn() -> DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Platform variables as a map.
    ///
    /// Preview-only variables and keys a `.env` file cannot hold are skipped.
    pub async fn remote_map(&self) -> Result<EnvMap, ClientError> {
        let vars = self.remote.fetch().await?;
        Ok(vars
            .into_iter()
            .filter(|v| !v.is_preview.unwrap_or(false))
            .filter_map(|v| {
                let key = v.key.filter(|k| !k.is_empty())?;
                if !dotenv::is_valid_key(&key) {
                    warn!(key = %key, "skipping variable that cannot be written to a .env file");
                    return None;
                }
                Some((key, v.value.unwrap_or_default()))
            })
            .collect())
    }

    /// Write the Platform's variables to `path`.
    ///
    /// An existing file is only replaced when `overwrite` is set.
    pub async fn export(
        &self,
        path: &Path,
        overwrite: bool,
        dry_run: bool,
    ) -> Result<ExportReport, ClientError> {
        let file = File::checked(path).context("export environment variables")?;
        if file.exists().await && !overwrite {
            return Err(ClientError::AlreadyExists(format!(
                "{} already exists, pass --force to overwrite",
                file.path().display()
            ))
            .context("export environment variables"));
        }

        let vars = self
            .remote_map()
            .await
            .context("export environment variables")?;
        let report = ExportReport {
            path: file.path().to_path_buf(),
            count: vars.len(),
            dry_run,
        };
        if dry_run {
            return Ok(report);
        }

        let header = vec![
            format!("Environment variables exported from {}", self.remote.describe()),
            format!("Generated at {}", self.timestamp()),
        ];
        file.write_atomic(dotenv::render(&vars, &header).as_bytes())
            .await
            .context("export environment variables")?;
        info!(
            count = report.count,
            path = %report.path.display(),
            "exported environment variables"
        );
        Ok(report)
    }

    /// Push every variable of `path` to the Platform in one bulk update
    pub async fn import(&self, path: &Path, dry_run: bool) -> Result<ImportReport, ClientError> {
        let file = File::checked(path).context("import environment variables")?;
        let contents = file
            .read_string()
            .await
            .context("import environment variables")?;
        let vars = dotenv::parse(&contents);
        let report = ImportReport {
            path: file.path().to_path_buf(),
            variables: vars,
            dry_run,
        };
        if dry_run || report.variables.is_empty() {
            return Ok(report);
        }

        self.remote
            .bulk_update(to_requests(&report.variables))
            .await
            .context("import environment variables")?;
        info!(count = report.variables.len(), "imported environment variables");
        Ok(report)
    }

    /// Reconcile `path` and the Platform in both directions.
    ///
    /// File values win on the Platform; the file is then rewritten from the
    /// updated Platform view. A missing file counts as empty.
    pub async fn sync(&self, path: &Path, dry_run: bool) -> Result<SyncReport, ClientError> {
        let file = File::checked(path).context("sync environment variables")?;
        let local = if file.exists().await {
            let contents = file
                .read_string()
                .await
                .context("sync environment variables")?;
            dotenv::parse(&contents)
        } else {
            EnvMap::new()
        };
        let remote = self
            .remote_map()
            .await
            .context("sync environment variables")?;

        let plan = SyncPlan::diff(&local, &remote);
        debug!(
            add_to_remote = plan.add_to_remote.len(),
            update_in_remote = plan.update_in_remote.len(),
            add_to_file = plan.add_to_file.len(),
            update_in_file = plan.update_in_file.len(),
            "computed sync plan"
        );
        let report = SyncReport {
            path: file.path().to_path_buf(),
            plan,
            dry_run,
        };
        if dry_run {
            return Ok(report);
        }

        if report.plan.has_remote_changes() {
            self.remote
                .bulk_update(to_requests(&report.plan.remote_changes()))
                .await
                .context("sync environment variables")?;
        }
        if report.plan.has_file_changes() {
            let merged = report.plan.remote_after(&remote);
            let header = vec![
                format!("Environment variables synced with {}", self.remote.describe()),
                format!("Synced at {}", self.timestamp()),
            ];
            file.write_atomic(dotenv::render(&merged, &header).as_bytes())
                .await
                .context("sync environment variables")?;
        }
        info!(changes = report.plan.total_changes(), "synced environment variables");
        Ok(report)
    }

    /// Drop keys from `path` that the Platform does not have
    pub async fn cleanup(
        &self,
        path: &Path,
        backup: bool,
        dry_run: bool,
    ) -> Result<CleanupReport, ClientError> {
        let file = File::checked(path).context("clean up environment file")?;
        let contents = file
            .read_string()
            .await
            .context("clean up environment file")?;
        let mut local = dotenv::parse(&contents);
        let remote = self
            .remote_map()
            .await
            .context("clean up environment file")?;

        let removed: Vec<String> = local
            .keys()
            .filter(|k| !remote.contains_key(*k))
            .cloned()
            .collect();
        let mut report = CleanupReport {
            path: file.path().to_path_buf(),
            removed,
            backup: None,
            dry_run,
        };
        if dry_run || report.removed.is_empty() {
            return Ok(report);
        }

        let now = (self.now)();
        if backup {
            let target = backup_path(file.path(), now);
            file.copy_to(&target)
                .await
                .context("back up environment file")?;
            info!(backup = %target.display(), "backed up environment file");
            report.backup = Some(target);
        }

        for key in &report.removed {
            local.remove(key);
        }
        let header = vec![
            format!(
                "Cleaned up against {}: removed {} variable(s)",
                self.remote.describe(),
                report.removed.len()
            ),
            format!("Cleaned at {}", now.to_rfc3339()),
        ];
        file.write_atomic(dotenv::render(&local, &header).as_bytes())
            .await
            .context("clean up environment file")?;
        info!(removed = report.removed.len(), "cleaned up environment file");
        Ok(report)
    }

    fn timestamp(&self) -> String {
        (self.now)().to_rfc3339()
    }
}

/// `P.backup.<yyyymmdd-hhmmss>` next to `path`
pub fn backup_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".backup.{}", at.format(BACKUP_TIMESTAMP_FORMAT)));
    PathBuf::from(name)
}

/// Bulk-update records; a `.env` file carries no flags
fn to_requests(vars: &EnvMap) -> Vec<EnvironmentVariableRequest> {
    vars.iter()
        .map(|(key, value)| EnvironmentVariableRequest {
            key: key.clone(),
            value: value.clone(),
            ..Default::default()
        })
        .collect()
}
