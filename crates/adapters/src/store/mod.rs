// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value store adapters

mod redis;

pub use self::redis::RedisStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBehavior, FakeStore, InFlightProbe, StoreCall};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("command failed: {0}")]
    Command(String),
}

/// One backing store in a lock fleet.
///
/// Stores are independent and unreplicated; the lock only ever trusts a
/// majority of them.
#[async_trait]
pub trait StoreAdapter: Clone + Send + Sync + 'static {
    /// Label identifying this store in logs
    fn endpoint(&self) -> &str;

    /// Set `key` to `value` with `ttl`, only if the key is absent.
    /// Returns whether this call created the key.
    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Delete `key`. Returns the number of keys removed (0 or 1).
    async fn try_delete(&self, key: &str) -> Result<u64, StoreError>;
}
