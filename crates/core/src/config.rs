// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock configuration
//!
//! Loaded from TOML, for example:
//!
//! ```toml
//! lease = "30s"
//! max_in_flight = 10
//! endpoints = ["redis://10.0.0.1:6379/", "redis://10.0.0.2:6379/"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default bound on simultaneous store requests per coordinator
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Shortest lease a store can apply; TTLs are set in whole milliseconds
pub const MIN_LEASE: Duration = Duration::from_millis(1);

/// Value written under a lock key
pub const DEFAULT_VALUE: &str = "1";

/// Errors from building or loading a lock configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one store endpoint is required")]
    NoEndpoints,
    #[error("lease must be at least 1ms")]
    LeaseTooShort,
    #[error("max_in_flight must be at least 1")]
    ZeroConcurrency,
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings shared by every round a coordinator runs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// TTL applied to the key on every store
    #[serde(with = "humantime_serde")]
    pub lease: Duration,
    /// Most store requests in flight at once
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Value written under the lock key
    #[serde(default = "default_value")]
    pub value: String,
    /// Store endpoint URLs
    #[serde(default)]
    pub endpoints: Vec<String>,
}

fn default_max_in_flight() -> usize {
    DEFAULT_MAX_IN_FLIGHT
}

fn default_value() -> String {
    DEFAULT_VALUE.to_string()
}

impl LockConfig {
    pub fn new(lease: Duration) -> Self {
        Self {
            lease,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            value: default_value(),
            endpoints: Vec::new(),
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Check lease and concurrency. Endpoints are checked by whoever turns
    /// them into store handles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lease < MIN_LEASE {
            return Err(ConfigError::LeaseTooShort);
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LockConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
