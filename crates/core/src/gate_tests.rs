// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn new_gate_has_full_capacity() {
    let gate = ConcurrencyGate::new(3);
    assert_eq!(gate.capacity(), 3);
    assert_eq!(gate.available(), 3);
    assert_eq!(gate.in_flight(), 0);
}

#[test]
fn zero_capacity_is_clamped() {
    let gate = ConcurrencyGate::new(0);
    assert_eq!(gate.capacity(), 1);
}

#[tokio::test]
async fn permits_return_on_drop() {
    let gate = ConcurrencyGate::new(2);

    let first = gate.acquire().await.unwrap();
    let second = gate.acquire().await.unwrap();
    assert_eq!(gate.in_flight(), 2);
    assert_eq!(gate.available(), 0);

    drop(first);
    assert_eq!(gate.available(), 1);
    drop(second);
    assert_eq!(gate.available(), 2);
}

#[tokio::test]
async fn clones_share_the_pool() {
    let gate = ConcurrencyGate::new(1);
    let other = gate.clone();

    let _held = gate.acquire().await.unwrap();

    assert_eq!(other.available(), 0);
    assert_eq!(other.in_flight(), 1);
}

#[tokio::test]
async fn separate_gates_are_independent() {
    let a = ConcurrencyGate::new(1);
    let b = ConcurrencyGate::new(1);

    let _held = a.acquire().await.unwrap();

    assert_eq!(b.available(), 1);
    assert!(b.acquire().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn waiter_unblocks_when_permit_released() {
    let gate = ConcurrencyGate::new(1);
    let held = gate.acquire().await.unwrap();

    let waiter = gate.clone();
    let handle = tokio::spawn(async move { waiter.acquire().await.map(|_| ()) });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!handle.is_finished());

    drop(held);
    assert_eq!(handle.await.unwrap(), Ok(()));
}
