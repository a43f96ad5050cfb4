// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-capacity permit pool bounding in-flight store requests

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Error from a gate whose pool has been closed. Nothing in this crate closes
/// the pool, so `acquire` only fails in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("concurrency gate closed")]
pub struct GateClosed;

/// A concurrency gate holding at most `capacity` permits.
///
/// Clones share the same pool. A coordinator builds its own gate; two gates
/// never share permits.
#[derive(Clone, Debug)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// A held permit, returned to its gate on drop
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate with `capacity` permits. A capacity of zero is clamped
    /// to one so the gate can always make progress.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Permits currently held
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Wait for a permit
    pub async fn acquire(&self) -> Result<GatePermit, GateClosed> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| GateClosed)?;
        Ok(GatePermit { _permit: permit })
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
