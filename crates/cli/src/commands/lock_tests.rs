// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ql_adapters::{FakeBehavior, FakeStore};
use ql_engine::RedLock;

const LEASE: Duration = Duration::from_secs(30);

fn fleet(behavior: FakeBehavior) -> Vec<FakeStore> {
    (0..3)
        .map(|i| FakeStore::new(format!("fake-{i}")).with_behavior(behavior))
        .collect()
}

#[tokio::test]
async fn acquire_and_release_round_trip() {
    let stores = fleet(FakeBehavior::Normal);
    let lock = RedLock::new(stores.clone(), LEASE).unwrap();
    let session = LockContext::background();

    acquire(&lock, &session, "deploy", Duration::from_secs(5))
        .await
        .unwrap();
    assert!(stores.iter().filter(|s| s.holds("deploy")).count() >= 2);

    release(&lock, &session, "deploy", Duration::from_secs(5))
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn cancelling_the_session_interrupts_acquire() {
    let lock = RedLock::new(fleet(FakeBehavior::Hang), LEASE).unwrap();
    let session = LockContext::background();
    let interrupt = session.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        interrupt.cancel();
    });

    let err = acquire(&lock, &session, "deploy", Duration::from_secs(60))
        .await
        .unwrap_err();

    assert_eq!(
        format!("{err:#}"),
        "failed to acquire lock 'deploy': context cancelled"
    );
}

#[tokio::test(start_paused = true)]
async fn timeout_bounds_each_round() {
    let lock = RedLock::new(fleet(FakeBehavior::Hang), LEASE).unwrap();

    let err = release(
        &lock,
        &LockContext::background(),
        "deploy",
        Duration::from_millis(200),
    )
    .await
    .unwrap_err();

    assert_eq!(
        format!("{err:#}"),
        "failed to release lock 'deploy': context deadline exceeded"
    );
}
