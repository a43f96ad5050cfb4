// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    TrySet {
        key: String,
        value: String,
        ttl: Duration,
    },
    TryDelete {
        key: String,
    },
}

/// How the fake answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FakeBehavior {
    /// Behave like a real store backed by the in-memory map
    #[default]
    Normal,
    /// Refuse every set and delete nothing, as if someone else holds the key
    Reject,
    /// Fail every call with a connection error
    Unreachable,
    /// Never answer
    Hang,
}

/// Tracks how many calls are in flight across any number of fakes
#[derive(Clone, Debug, Default)]
pub struct InFlightProbe {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

struct InFlightGuard {
    current: Arc<AtomicUsize>,
}

impl InFlightProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls in flight right now
    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// Most calls ever in flight at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlightGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard {
            current: Arc::clone(&self.current),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory store honoring set-if-absent and TTLs
#[derive(Clone)]
pub struct FakeStore {
    endpoint: Arc<str>,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    behavior: Arc<Mutex<FakeBehavior>>,
    latency: Arc<Mutex<Duration>>,
    probe: Option<InFlightProbe>,
}

impl FakeStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            endpoint: endpoint.into(),
            entries: Arc::default(),
            calls: Arc::default(),
            behavior: Arc::default(),
            latency: Arc::default(),
            probe: None,
        }
    }

    /// Start with the given behavior
    pub fn with_behavior(self, behavior: FakeBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Delay every answer by `latency`
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = latency;
        self
    }

    /// Report in-flight calls to a shared probe
    pub fn with_probe(mut self, probe: InFlightProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn set_behavior(&self, behavior: FakeBehavior) {
        *self.behavior.lock().unwrap_or_else(|e| e.into_inner()) = behavior;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Value currently stored under `key`, ignoring expired entries
    pub fn value(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    pub fn holds(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Remaining TTL of `key`, if it is live
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .map(|entry| entry.expires_at.saturating_duration_since(Instant::now()))
            .filter(|ttl| !ttl.is_zero())
    }

    /// Seed a key directly, bypassing call recording
    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at: Instant::now() + ttl,
                },
            );
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Apply latency and failure behavior shared by every call
    async fn answer(&self) -> Result<FakeBehavior, StoreError> {
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let behavior = *self.behavior.lock().unwrap_or_else(|e| e.into_inner());
        match behavior {
            FakeBehavior::Hang => std::future::pending().await,
            FakeBehavior::Unreachable => Err(StoreError::Connection(format!(
                "{} unreachable",
                self.endpoint
            ))),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl StoreAdapter for FakeStore {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.record(StoreCall::TrySet {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        });
        let _in_flight = self.probe.as_ref().map(InFlightProbe::enter);

        if self.answer().await? == FakeBehavior::Reject {
            return Ok(false);
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|entry| entry.expires_at > now) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn try_delete(&self, key: &str) -> Result<u64, StoreError> {
        self.record(StoreCall::TryDelete {
            key: key.to_string(),
        });
        let _in_flight = self.probe.as_ref().map(InFlightProbe::enter);

        if self.answer().await? == FakeBehavior::Reject {
            return Ok(0);
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.remove(key) {
            Some(entry) if entry.expires_at > now => Ok(1),
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
