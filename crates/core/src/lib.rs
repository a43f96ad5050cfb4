// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ql-core: building blocks for the quorum lock
//!
//! This crate provides:
//! - A cancellable, deadline-bound request context
//! - The lock error taxonomy
//! - A first-to-threshold vote aggregator
//! - A fixed-capacity concurrency gate
//! - TOML-backed lock configuration

pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod quorum;

pub use config::{ConfigError, LockConfig, DEFAULT_MAX_IN_FLIGHT, DEFAULT_VALUE, MIN_LEASE};
pub use context::{ContextError, LockContext};
pub use error::LockError;
pub use gate::{ConcurrencyGate, GateClosed, GatePermit};
pub use quorum::{quorum, Decision, QuorumRound, Reporter};
