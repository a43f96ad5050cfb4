// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcomes of a failed lock operation

use crate::context::ContextError;
use thiserror::Error;

/// Errors returned by lock acquisition and release.
///
/// Every variant is a plain value so callers can compare by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LockError {
    /// The supplied context carries no deadline; nothing was sent to any store
    #[error("context with deadline needed")]
    DeadlineRequired,
    /// The round finished without a majority of stores accepting the key
    #[error("unable to acquire lock")]
    UnableToAcquire,
    /// The round finished without a majority of stores deleting the key
    #[error("unable to release lock")]
    UnableToRelease,
    /// The context ended before the round was decided
    #[error(transparent)]
    Context(#[from] ContextError),
}
