// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::store::{StoreAdapter, StoreError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any StoreAdapter
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StoreAdapter> StoreAdapter for TracedStore<S> {
    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let span = tracing::debug_span!(
            "store.try_set",
            endpoint = self.inner.endpoint(),
            key,
            ttl_ms = ttl.as_millis() as u64
        );

        async {
            let start = std::time::Instant::now();
            let result = self.inner.try_set(key, value, ttl).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(true) => tracing::debug!(elapsed_ms, "key set"),
                Ok(false) => tracing::debug!(elapsed_ms, "key already present"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "set failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn try_delete(&self, key: &str) -> Result<u64, StoreError> {
        let span = tracing::debug_span!("store.try_delete", endpoint = self.inner.endpoint(), key);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.try_delete(key).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(removed) => tracing::debug!(elapsed_ms, removed, "deleted"),
                // The lock survives until its lease runs out on this store
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "delete failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
