// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Majority-vote lock over independent stores
//!
//! Every acquire or release is one round: a worker per store, each behind the
//! coordinator's concurrency gate, voting into a `QuorumRound`. The round is
//! decided as soon as a strict majority agrees, so latency follows the
//! quorum-th fastest store rather than the slowest.

use crate::lock::DistributedLock;
use async_trait::async_trait;
use ql_adapters::{StoreAdapter, StoreError};
use ql_core::{
    ConcurrencyGate, ConfigError, Decision, LockConfig, LockContext, LockError, QuorumRound,
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_VALUE, MIN_LEASE,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
enum Operation {
    Acquire,
    Release,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Acquire => "acquire",
            Operation::Release => "release",
        }
    }

    fn not_reached(self) -> LockError {
        match self {
            Operation::Acquire => LockError::UnableToAcquire,
            Operation::Release => LockError::UnableToRelease,
        }
    }
}

/// Lock coordinator over a fixed fleet of stores.
///
/// The coordinator keeps no record of which keys are locked; each call is an
/// independent round. A fleet of one store is accepted and behaves as a plain
/// single-store lock (quorum of one).
#[derive(Clone)]
pub struct RedLock<S> {
    stores: Arc<[S]>,
    gate: ConcurrencyGate,
    lease: Duration,
    value: Arc<str>,
}

impl<S: StoreAdapter> RedLock<S> {
    /// Build a coordinator that sets keys with a TTL of `lease`
    pub fn new(stores: Vec<S>, lease: Duration) -> Result<Self, ConfigError> {
        if stores.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if lease < MIN_LEASE {
            return Err(ConfigError::LeaseTooShort);
        }
        if stores.len() == 1 {
            tracing::warn!(
                endpoint = stores[0].endpoint(),
                "lock fleet has a single store; the lock is only as available as that store"
            );
        }

        Ok(Self {
            stores: stores.into(),
            gate: ConcurrencyGate::new(DEFAULT_MAX_IN_FLIGHT),
            lease,
            value: DEFAULT_VALUE.into(),
        })
    }

    /// Build a coordinator from `config`. The config's endpoint list is not
    /// consulted; `stores` are the already-opened handles.
    pub fn from_config(stores: Vec<S>, config: &LockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(stores, config.lease)?
            .with_max_in_flight(config.max_in_flight)
            .with_value(config.value.as_str()))
    }

    /// Replace the gate with a fresh one of `max_in_flight` permits (at least 1)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.gate = ConcurrencyGate::new(max_in_flight);
        self
    }

    /// Value written under locked keys
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.into();
        self
    }

    pub fn endpoint_count(&self) -> usize {
        self.stores.len()
    }

    /// Stores that must agree for an operation to succeed
    pub fn quorum(&self) -> usize {
        ql_core::quorum(self.stores.len())
    }

    pub fn lease(&self) -> Duration {
        self.lease
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Set `key` on a majority of stores, only where it is absent.
    ///
    /// A failed attempt leaves the key on whichever minority accepted it;
    /// those copies expire with the lease.
    pub async fn acquire(&self, ctx: &LockContext, key: &str) -> Result<(), LockError> {
        let lease = self.lease;
        let value = Arc::clone(&self.value);
        self.round(ctx, key, Operation::Acquire, move |store: S, key| {
            let value = Arc::clone(&value);
            async move { store.try_set(&key, &value, lease).await }
        })
        .await
    }

    /// Delete `key` from a majority of stores. A store only counts when it
    /// actually removed the key.
    pub async fn release(&self, ctx: &LockContext, key: &str) -> Result<(), LockError> {
        self.round(ctx, key, Operation::Release, |store: S, key| async move {
            store.try_delete(&key).await.map(|removed| removed == 1)
        })
        .await
    }

    async fn round<F, Fut>(
        &self,
        ctx: &LockContext,
        key: &str,
        operation: Operation,
        call: F,
    ) -> Result<(), LockError>
    where
        F: Fn(S, Arc<str>) -> Fut,
        Fut: Future<Output = Result<bool, StoreError>> + Send + 'static,
    {
        if ctx.deadline().is_none() {
            tracing::error!(
                key,
                operation = operation.as_str(),
                "{}",
                LockError::DeadlineRequired
            );
            return Err(LockError::DeadlineRequired);
        }
        if let Some(reason) = ctx.err() {
            tracing::debug!(
                key,
                operation = operation.as_str(),
                reason = %reason,
                "context already ended"
            );
            return Err(reason.into());
        }

        let start = Instant::now();
        let round = QuorumRound::new(self.stores.len());
        let quorum = round.threshold();
        let shared_key: Arc<str> = Arc::from(key);
        tracing::debug!(
            key,
            operation = operation.as_str(),
            stores = self.stores.len(),
            quorum,
            gate_in_flight = self.gate.in_flight(),
            "round started"
        );

        for store in self.stores.iter() {
            let endpoint = store.endpoint().to_string();
            let pending = call(store.clone(), Arc::clone(&shared_key));
            let reporter = round.reporter();
            let gate = self.gate.clone();
            let ctx = ctx.clone();

            // Detached: a worker still running when the round is decided
            // finishes on its own, bounded by the same context.
            tokio::spawn(async move {
                let permit = tokio::select! {
                    permit = gate.acquire() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return,
                    },
                    _ = ctx.done() => return,
                };

                // Quorum may close right after this check; the extra store
                // call that slips through is harmless.
                if reporter.is_settled() {
                    return;
                }

                let accepted = tokio::select! {
                    outcome = pending => match outcome {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!(endpoint = %endpoint, error = %e, "store call failed");
                            false
                        }
                    },
                    _ = ctx.done() => return,
                };

                drop(permit);
                reporter.report(accepted);
            });
        }

        let decision = round.decide(ctx).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match decision {
            Ok(Decision::Reached { votes }) => {
                tracing::debug!(
                    key,
                    operation = operation.as_str(),
                    votes,
                    quorum,
                    elapsed_ms,
                    "quorum reached"
                );
                Ok(())
            }
            Ok(Decision::NotReached { votes }) => {
                tracing::info!(
                    key,
                    operation = operation.as_str(),
                    votes,
                    quorum,
                    elapsed_ms,
                    "quorum not reached"
                );
                Err(operation.not_reached())
            }
            Err(reason) => {
                tracing::warn!(
                    key,
                    operation = operation.as_str(),
                    quorum,
                    elapsed_ms,
                    reason = %reason,
                    "context ended before the round was decided"
                );
                Err(reason.into())
            }
        }
    }
}

#[async_trait]
impl<S: StoreAdapter> DistributedLock for RedLock<S> {
    async fn acquire(&self, ctx: &LockContext, key: &str) -> Result<(), LockError> {
        RedLock::acquire(self, ctx, key).await
    }

    async fn release(&self, ctx: &LockContext, key: &str) -> Result<(), LockError> {
        RedLock::release(self, ctx, key).await
    }
}

#[cfg(test)]
#[path = "redlock_tests.rs"]
mod tests;
