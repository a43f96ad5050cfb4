// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ql acquire <key>` and `ql release <key>`

use anyhow::{Context, Result};
use clap::Args;
use ql_core::LockContext;
use ql_engine::DistributedLock;
use std::time::Duration;

#[derive(Args)]
pub struct LockArgs {
    /// Lock key (e.g., "deploy:prod")
    pub key: String,
}

/// Acquire `key`, giving the round `timeout` to decide. Cancelling `parent`
/// ends the round early.
pub async fn acquire(
    lock: &dyn DistributedLock,
    parent: &LockContext,
    key: &str,
    timeout: Duration,
) -> Result<()> {
    let ctx = parent.child_with_timeout(timeout);
    lock.acquire(&ctx, key)
        .await
        .with_context(|| format!("failed to acquire lock '{key}'"))
}

pub async fn release(
    lock: &dyn DistributedLock,
    parent: &LockContext,
    key: &str,
    timeout: Duration,
) -> Result<()> {
    let ctx = parent.child_with_timeout(timeout);
    lock.release(&ctx, key)
        .await
        .with_context(|| format!("failed to release lock '{key}'"))
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
