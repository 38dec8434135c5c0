//! Deployment watch loop timing and outcomes

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coolifyme::deploy::watch::{watch, WatchOptions};
use coolifyme::deploy::DeploymentStatus;
use coolifyme::errors::ClientError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn status(value: &str, logs: Option<&str>) -> DeploymentStatus {
    DeploymentStatus {
        deployment_uuid: "dep1".into(),
        status: value.into(),
        logs: logs.map(str::to_string),
        ..Default::default()
    }
}

/// Fetch function replaying `snapshots` in order and counting calls
fn replay(
    snapshots: Vec<DeploymentStatus>,
) -> (
    Arc<Mutex<usize>>,
    impl FnMut() -> std::future::Ready<Result<DeploymentStatus, ClientError>>,
) {
    let calls = Arc::new(Mutex::new(0));
    let queue = Arc::new(Mutex::new(VecDeque::from(snapshots)));
    let counter = calls.clone();
    let fetch = move || {
        *counter.lock().unwrap() += 1;
        let next = queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::EmptyResponse("no more snapshots".into()));
        std::future::ready(next)
    };
    (calls, fetch)
}

#[tokio::test(start_paused = true)]
async fn test_watch_until_finished() {
    let (calls, fetch) = replay(vec![
        status("running", None),
        status("building", None),
        status("finished", None),
    ]);

    let started = Instant::now();
    let result = watch(
        &WatchOptions::default(),
        &CancellationToken::new(),
        fetch,
        tokio::time::sleep,
    )
    .await
    .unwrap();

    assert_eq!(result.status, "finished");
    assert_eq!(*calls.lock().unwrap(), 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(10), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(10_100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_watch_failure_carries_log_tail() {
    let logs = r#"[{"output":"step 1","hidden":false},{"output":"secret","hidden":true},{"output":"boom","hidden":false}]"#;
    let (_, fetch) = replay(vec![status("queued", None), status("failed", Some(logs))]);

    let err = watch(
        &WatchOptions::default(),
        &CancellationToken::new(),
        fetch,
        tokio::time::sleep,
    )
    .await
    .unwrap_err();

    match err {
        ClientError::DeploymentFailed { status, logs } => {
            assert_eq!(status, "failed");
            assert_eq!(logs, "step 1\nboom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_watch_custom_interval() {
    let (_, fetch) = replay(vec![status("in_progress", None), status("cancelled", None)]);
    let options = WatchOptions {
        poll_interval: Duration::from_secs(1),
    };

    let started = Instant::now();
    let err = watch(&options, &CancellationToken::new(), fetch, tokio::time::sleep)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::DeploymentFailed { .. }));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_watch_stops_on_cancel() {
    let cancel = CancellationToken::new();
    let (calls, fetch) = replay(vec![status("running", None); 100]);

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        trigger.cancel();
    });

    let err = watch(&WatchOptions::default(), &cancel, fetch, tokio::time::sleep)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Cancelled));
    assert_eq!(*calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn test_fetch_errors_propagate() {
    let (_, fetch) = replay(vec![]);
    let err = watch(
        &WatchOptions::default(),
        &CancellationToken::new(),
        fetch,
        tokio::time::sleep,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ClientError::EmptyResponse(_)));
}
