//! Bounded fan-out of one action over many resources

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::ClientError;

/// Actions running at once when the caller does not say otherwise
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Result of the action for one resource
#[derive(Debug)]
pub struct ItemResult<T> {
    pub id: String,
    pub outcome: Result<T, ClientError>,
}

/// Results of a batch, in completion order
#[derive(Debug)]
pub struct BulkReport<T> {
    pub results: Vec<ItemResult<T>>,
}

/// Serializable view of one item
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> BulkReport<T> {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Failed items with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ClientError)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.id.as_str(), e)))
    }

    /// e.g. "2/3 operations completed successfully"
    pub fn summary(&self) -> String {
        format!(
            "{}/{} operations completed successfully",
            self.succeeded(),
            self.total()
        )
    }

    pub fn items(&self) -> Vec<ItemSummary> {
        self.results
            .iter()
            .map(|r| ItemSummary {
                id: r.id.clone(),
                success: r.outcome.is_ok(),
                error: r.outcome.as_ref().err().map(|e| e.to_string()),
            })
            .collect()
    }
}

/// Run `action` for every id with at most `concurrency` in flight.
///
/// Items are dispatched in input order and never abort the batch; each
/// outcome is reported. Cancelling `cancel` fails the items that have not
/// finished yet with [`ClientError::Cancelled`].
pub async fn run<T, F, Fut>(
    ids: Vec<String>,
    concurrency: usize,
    cancel: &CancellationToken,
    action: F,
) -> BulkReport<T>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    let concurrency = concurrency.max(1);
    let total = ids.len();
    info!(total, concurrency, "starting bulk operation");

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let action = Arc::new(action);
    let (tx, mut rx) = mpsc::channel::<(usize, ItemResult<T>)>(total.max(1));

    let mut pending: Vec<Option<String>> = Vec::with_capacity(total);
    for (index, id) in ids.into_iter().enumerate() {
        pending.push(Some(id.clone()));
        let semaphore = Arc::clone(&semaphore);
        let action = Arc::clone(&action);
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(ClientError::Cancelled),
                outcome = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| ClientError::Cancelled)?;
                    debug!(id = %id, "running bulk item");
                    action(id.clone()).await
                } => outcome,
            };
            let _ = tx.send((index, ItemResult { id, outcome })).await;
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(total);
    while let Some((index, result)) = rx.recv().await {
        if let Err(e) = &result.outcome {
            warn!(id = %result.id, error = %e, "bulk item failed");
        }
        pending[index] = None;
        results.push(result);
    }

    // a task that panicked never reported back
    for id in pending.into_iter().flatten() {
        results.push(ItemResult {
            id,
            outcome: Err(ClientError::Cancelled),
        });
    }

    let report = BulkReport { results };
    info!("{}", report.summary());
    report
}
