// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock interface

use async_trait::async_trait;
use ql_core::{LockContext, LockError};

/// A mutual-exclusion lock keyed by resource name.
///
/// Both operations require a context with a deadline and fail with
/// `LockError::DeadlineRequired` otherwise.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Take the lock on `key`
    async fn acquire(&self, ctx: &LockContext, key: &str) -> Result<(), LockError>;

    /// Give up the lock on `key`
    async fn release(&self, ctx: &LockContext, key: &str) -> Result<(), LockError>;
}
