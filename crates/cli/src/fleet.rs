// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store fleet selection shared by every command

use anyhow::Result;
use clap::Args;
use ql_adapters::{RedisStore, TracedStore};
use ql_core::{ConfigError, LockConfig};
use ql_engine::RedLock;
use std::path::PathBuf;
use std::time::Duration;

/// Lease used when neither a config file nor `--lease` sets one
pub const DEFAULT_LEASE: Duration = Duration::from_secs(30);

#[derive(Args, Debug)]
pub struct FleetArgs {
    /// Store endpoint URL; repeat once per store (overrides the config file)
    #[arg(short = 'e', long = "endpoint", global = true)]
    pub endpoints: Vec<String>,

    /// Lock config file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Key TTL on each store (e.g., "30s", "2m")
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub lease: Option<Duration>,

    /// Most store requests in flight at once
    #[arg(long, global = true)]
    pub max_in_flight: Option<usize>,

    /// Time allowed for each acquire or release round
    #[arg(long, global = true, default_value = "5s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
}

impl FleetArgs {
    /// Merge flags over the config file (if any) and validate the result
    pub fn resolve(&self) -> Result<LockConfig> {
        let mut config = match &self.config {
            Some(path) => LockConfig::load(path)?,
            None => LockConfig::new(DEFAULT_LEASE),
        };

        if !self.endpoints.is_empty() {
            config.endpoints = self.endpoints.clone();
        }
        if let Some(lease) = self.lease {
            config.lease = lease;
        }
        if let Some(max_in_flight) = self.max_in_flight {
            config.max_in_flight = max_in_flight;
        }

        config.validate()?;
        if config.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints.into());
        }
        Ok(config)
    }

    /// Open a traced Redis store per endpoint. No connection is made until
    /// the first round.
    pub fn connect(&self) -> Result<RedLock<TracedStore<RedisStore>>> {
        let config = self.resolve()?;
        let stores = config
            .endpoints
            .iter()
            .map(|url| RedisStore::open(url).map(TracedStore::new))
            .collect::<Result<Vec<_>, _>>()?;

        let lock = RedLock::from_config(stores, &config)?;
        tracing::debug!(
            endpoints = lock.endpoint_count(),
            quorum = lock.quorum(),
            lease_ms = lock.lease().as_millis() as u64,
            max_in_flight = lock.gate().capacity(),
            "lock fleet ready"
        );
        Ok(lock)
    }
}

#[cfg(test)]
#[path = "fleet_tests.rs"]
mod tests;
