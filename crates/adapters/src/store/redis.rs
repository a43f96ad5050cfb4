// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed store

use super::{StoreAdapter, StoreError};
use ::redis::aio::ConnectionManager;
use ::redis::{Client, RedisError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// Store adapter for a single, unreplicated Redis instance.
///
/// The connection is established on first use. A failed connect leaves the
/// store unconnected and is retried by the next call; once connected, the
/// connection manager reconnects on its own.
#[derive(Clone)]
pub struct RedisStore {
    endpoint: Arc<str>,
    client: Client,
    conn: Arc<OnceCell<ConnectionManager>>,
}

impl RedisStore {
    /// Create a store for `url` (e.g. `redis://127.0.0.1:6379/0`).
    /// No connection is made here.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| StoreError::InvalidEndpoint {
            endpoint: redact(url),
            message: e.to_string(),
        })?;
        Ok(Self {
            endpoint: redact(url).into(),
            client,
            conn: Arc::new(OnceCell::new()),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                self.client
                    .get_connection_manager()
                    .await
                    .map_err(classify)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl StoreAdapter for RedisStore {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        // PX takes whole milliseconds; callers never pass a lease under 1ms
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let reply: Option<String> = ::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(classify)?;
        Ok(reply.is_some())
    }

    async fn try_delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let removed: u64 = ::redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(classify)?;
        Ok(removed)
    }
}

fn classify(e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
    {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Command(e.to_string())
    }
}

/// Strip credentials from a store URL before it reaches logs or errors.
/// Input that does not parse as a URL is returned unchanged.
fn redact(endpoint: &str) -> String {
    let Ok(mut url) = Url::parse(endpoint) else {
        return endpoint.to_string();
    };
    // Both fail only for URLs without a host, which carry no credentials
    let _ = url.set_password(None);
    let _ = url.set_username("");
    url.to_string()
}
