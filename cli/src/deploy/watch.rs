//! State machine and poll loop for watching a deployment

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::deploy::controller::DeploymentStatus;
use crate::errors::ClientError;

/// Statuses that end a deployment successfully
pub const SUCCESS_STATUSES: &[&str] = &["finished", "success", "completed"];

/// Statuses that end a deployment unsuccessfully
pub const FAILURE_STATUSES: &[&str] = &["failed", "error", "cancelled"];

/// Number of log entries carried by a failure
pub const LOG_TAIL_LINES: usize = 10;

/// Watch loop settings
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Delay between two status fetches
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Watch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    /// No snapshot seen yet
    Unknown,

    /// Deployment queued or running
    InProgress,

    /// Finished successfully
    TerminalSuccess,

    /// Failed or cancelled
    TerminalFailure,
}

impl WatchState {
    /// Classify a raw Platform status string
    pub fn classify(status: &str) -> Self {
        let status = status.trim().to_ascii_lowercase();
        if SUCCESS_STATUSES.contains(&status.as_str()) {
            WatchState::TerminalSuccess
        } else if FAILURE_STATUSES.contains(&status.as_str()) {
            WatchState::TerminalFailure
        } else {
            WatchState::InProgress
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WatchState::TerminalSuccess | WatchState::TerminalFailure)
    }

    /// Transition on a new snapshot; terminal states are absorbing
    pub fn next(self, status: &str) -> Self {
        if self.is_terminal() {
            return self;
        }
        WatchState::classify(status)
    }
}

/// Deployment watcher
#[derive(Debug, Clone)]
pub struct Watcher {
    state: WatchState,
    last: Option<DeploymentStatus>,
    ticks: u32,
}

impl Watcher {
    pub fn new() -> Self {
        Self {
            state: WatchState::Unknown,
            last: None,
            ticks: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Last snapshot observed
    pub fn last(&self) -> Option<&DeploymentStatus> {
        self.last.as_ref()
    }

    /// Number of snapshots observed
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Feed a snapshot and return the resulting state
    pub fn observe(&mut self, snapshot: DeploymentStatus) -> WatchState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.ticks += 1;
        self.state = self.state.next(&snapshot.status);
        self.last = Some(snapshot);
        self.state
    }

    /// Convert a terminal state into the watch outcome
    fn outcome(&self) -> Option<Result<DeploymentStatus, ClientError>> {
        let last = self.last.clone()?;
        match self.state {
            WatchState::TerminalSuccess => Some(Ok(last)),
            WatchState::TerminalFailure => {
                let logs = last.logs.as_deref().map(log_tail).unwrap_or_default();
                Some(Err(ClientError::DeploymentFailed {
                    status: last.status,
                    logs,
                }))
            }
            WatchState::Unknown | WatchState::InProgress => None,
        }
    }
}

impl Default for Watcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll `fetch` until the deployment reaches a terminal state.
///
/// The first fetch happens immediately; later ones wait `poll_interval`
/// through `sleep_fn`. A terminal failure is returned as
/// [`ClientError::DeploymentFailed`] carrying the tail of the logs.
pub async fn watch<F, Fut, S, SFut>(
    options: &WatchOptions,
    cancel: &CancellationToken,
    mut fetch: F,
    sleep_fn: S,
) -> Result<DeploymentStatus, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DeploymentStatus, ClientError>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut watcher = Watcher::new();
    loop {
        let snapshot = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            r = fetch() => r?,
        };

        let previous = watcher.state();
        let status = snapshot.status.clone();
        let state = watcher.observe(snapshot);
        if state != previous {
            info!(status = %status, state = ?state, "deployment state changed");
        } else {
            debug!(status = %status, tick = watcher.ticks(), "deployment still in progress");
        }

        if let Some(outcome) = watcher.outcome() {
            if outcome.is_err() {
                warn!(status = %status, "deployment ended unsuccessfully");
            }
            return outcome;
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = sleep_fn(options.poll_interval) => {}
        }
    }
}

/// Last [`LOG_TAIL_LINES`] visible log entries.
///
/// Deployment logs are a JSON array of `{output, hidden, ...}` entries;
/// anything else is treated as plain text.
pub fn log_tail(logs: &str) -> String {
    let entries = serde_json::from_str::<Vec<serde_json::Value>>(logs);
    let lines: Vec<String> = match entries {
        Ok(entries) => entries
            .iter()
            .filter(|e| !e.get("hidden").and_then(|h| h.as_bool()).unwrap_or(false))
            .filter_map(|e| e.get("output").and_then(|o| o.as_str()))
            .flat_map(|o| o.lines())
            .map(|l| l.to_string())
            .collect(),
        Err(_) => logs.lines().map(|l| l.to_string()).collect(),
    };
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}
