// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock operations

use std::time::Duration;
use thiserror::Error;
use zkl_adapters::CoordinationError;
use zkl_core::{LockType, PathError};

/// Errors from acquiring, releasing or inspecting locks
#[derive(Debug, Error)]
pub enum LockError {
    #[error("coordination service unavailable: {0}")]
    CoordinationUnavailable(#[source] CoordinationError),
    #[error("queue entry {node} vanished from its queue")]
    SelfNodeMissing { node: String },
    #[error("timed out after {waited:?} waiting for lock {key}")]
    AcquireTimeout { key: String, waited: Duration },
    #[error("failed to acquire lock with queue entry {node}: {source}")]
    AcquireError {
        node: String,
        #[source]
        source: CoordinationError,
    },
    #[error("malformed queue entry '{name}'")]
    MalformedQueueEntry { name: String },
    #[error("invalid lock path: {0}")]
    InvalidPath(#[source] PathError),
    #[error("coordination error: {0}")]
    Coordination(#[source] CoordinationError),
}

impl LockError {
    /// Bounded wait ran out
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::AcquireTimeout { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LockError::CoordinationUnavailable(_))
    }

    /// Classify a failure inside the ranking/waiting loop of `node`
    pub(crate) fn during_acquire(node: &str, err: CoordinationError) -> Self {
        if err.is_unavailable() {
            LockError::CoordinationUnavailable(err)
        } else {
            LockError::AcquireError {
                node: node.to_string(),
                source: err,
            }
        }
    }
}

impl From<CoordinationError> for LockError {
    fn from(err: CoordinationError) -> Self {
        if err.is_unavailable() {
            LockError::CoordinationUnavailable(err)
        } else {
            LockError::Coordination(err)
        }
    }
}

impl From<PathError> for LockError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::MalformedQueueEntry(name) => LockError::MalformedQueueEntry { name },
            other => LockError::InvalidPath(other),
        }
    }
}

/// Errors creating permanent root nodes at startup
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to ensure root {root} for lock type {lock_type}: {source}")]
    Root {
        lock_type: LockType,
        root: String,
        #[source]
        source: CoordinationError,
    },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
