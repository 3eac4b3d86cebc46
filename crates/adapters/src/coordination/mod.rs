// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination-service adapters
//!
//! A thin capability set over a ZooKeeper-like store: sequential ephemeral
//! nodes, existence checks, child listing and one-shot watches.

mod zk;

pub use zk::{ZkAdapter, ZkClient};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CoordinationCall, FakeCoordinationAdapter};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors from coordination operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinationError {
    #[error("coordination service unavailable: {0}")]
    Unavailable(String),
    #[error("node does not exist: {0}")]
    NoNode(String),
    #[error("node already exists: {0}")]
    NodeExists(String),
    #[error("unexpected node state at {path}: {reason}")]
    NodeState { path: String, reason: String },
    #[error("watch on {0} closed without firing")]
    WatchClosed(String),
}

impl CoordinationError {
    /// Transport or session fault
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CoordinationError::Unavailable(_))
    }

    pub fn is_no_node(&self) -> bool {
        matches!(self, CoordinationError::NoNode(_))
    }
}

/// What a watch observed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchEventKind {
    Deleted,
    DataChanged,
    /// Any other notification (session state, watch removal)
    Other,
}

/// A fired watch notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: String,
    pub kind: WatchEventKind,
}

/// Sending half of a one-shot watch; consumed by the first notification
#[derive(Debug)]
pub struct WatchTrigger {
    tx: oneshot::Sender<WatchEvent>,
}

impl WatchTrigger {
    /// Deliver the notification. A waiter that already gave up is not an error.
    pub fn fire(self, event: WatchEvent) {
        let _ = self.tx.send(event);
    }
}

/// Receiving half of a one-shot watch
///
/// Fires at most once. Watching again requires a new registration.
#[derive(Debug)]
pub struct Watch {
    path: String,
    rx: oneshot::Receiver<WatchEvent>,
}

impl Watch {
    pub fn channel(path: impl Into<String>) -> (WatchTrigger, Watch) {
        let (tx, rx) = oneshot::channel();
        (
            WatchTrigger { tx },
            Watch {
                path: path.into(),
                rx,
            },
        )
    }

    /// Watched node path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Wait for the notification
    pub async fn wait(self) -> Result<WatchEvent, CoordinationError> {
        let Watch { path, rx } = self;
        rx.await.map_err(|_| CoordinationError::WatchClosed(path))
    }
}

/// Adapter for coordination-service primitives
///
/// Paths are absolute within the adapter's namespace. Each call is one round
/// trip to the service.
#[async_trait]
pub trait CoordinationAdapter: Clone + Send + Sync + 'static {
    /// Create missing ancestors, then an ephemeral node named `path` plus a
    /// service-assigned sequence suffix. Returns the created node's full path.
    async fn create_ephemeral_sequential(&self, path: &str) -> Result<String, CoordinationError>;

    /// Create missing ancestors, then a persistent node at `path`.
    /// Fails with `NodeExists` if it is already there.
    async fn create_persistent(&self, path: &str) -> Result<(), CoordinationError>;

    /// Remove the node at `path`. Fails with `NoNode` if it is absent.
    async fn delete(&self, path: &str) -> Result<(), CoordinationError>;

    async fn exists(&self, path: &str) -> Result<bool, CoordinationError>;

    /// Child names of `path`, in no particular order
    async fn list_children(&self, path: &str) -> Result<Vec<String>, CoordinationError>;

    /// Register a one-shot watch for the next deletion or data change of
    /// `path`. Fails with `NoNode` if the node is already gone.
    async fn watch_once(&self, path: &str) -> Result<Watch, CoordinationError>;
}
