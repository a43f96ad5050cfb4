// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ql_adapters::FakeStore;
use ql_engine::RedLock;
use tempfile::TempDir;

const KEY: &str = "deploy";
const TIMEOUT: Duration = Duration::from_secs(5);

fn fleet() -> Vec<FakeStore> {
    (0..3).map(|i| FakeStore::new(format!("fake-{i}"))).collect()
}

/// Stores still holding the key; a majority would mean the lock was kept
fn held(stores: &[FakeStore]) -> usize {
    stores.iter().filter(|s| s.holds(KEY)).count()
}

fn exec_args(command: &[&str]) -> ExecArgs {
    ExecArgs {
        key: KEY.to_string(),
        command: command.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn runs_command_then_releases() {
    let stores = fleet();
    let lock = RedLock::new(stores.clone(), Duration::from_secs(30)).unwrap();
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("ran");

    exec(
        &lock,
        &LockContext::background(),
        exec_args(&["touch", marker.to_str().unwrap()]),
        TIMEOUT,
    )
    .await
    .unwrap();

    assert!(marker.exists());
    assert!(held(&stores) < 2);
}

#[tokio::test]
async fn failing_command_still_releases() {
    let stores = fleet();
    let lock = RedLock::new(stores.clone(), Duration::from_secs(30)).unwrap();

    exec(&lock, &LockContext::background(), exec_args(&["false"]), TIMEOUT)
        .await
        .unwrap();

    assert!(held(&stores) < 2);
}

#[tokio::test]
async fn unstartable_command_releases_and_reports() {
    let stores = fleet();
    let lock = RedLock::new(stores.clone(), Duration::from_secs(30)).unwrap();

    let err = exec(
        &lock,
        &LockContext::background(),
        exec_args(&["/nonexistent/ql-test-program"]),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("failed to start"), "{err:#}");
    assert!(held(&stores) < 2);
}

#[tokio::test]
async fn held_lock_keeps_command_from_running() {
    let stores = fleet();
    for store in &stores {
        store.insert(KEY, "someone-else", Duration::from_secs(30));
    }
    let lock = RedLock::new(stores.clone(), Duration::from_secs(30)).unwrap();
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("ran");

    let err = exec(
        &lock,
        &LockContext::background(),
        exec_args(&["touch", marker.to_str().unwrap()]),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("failed to acquire lock 'deploy'"));
    assert!(!marker.exists());
    assert!(stores.iter().all(|s| s.value(KEY).as_deref() == Some("someone-else")));
}

#[tokio::test]
async fn cancelled_session_skips_the_command() {
    let stores = fleet();
    let lock = RedLock::new(stores.clone(), Duration::from_secs(30)).unwrap();
    let session = LockContext::background();
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("ran");

    session.cancel();
    let err = exec(
        &lock,
        &session,
        exec_args(&["touch", marker.to_str().unwrap()]),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    assert_eq!(format!("{err:#}"), "failed to acquire lock 'deploy': context cancelled");
    assert!(!marker.exists());
    assert_eq!(held(&stores), 0);
}
