// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distributed mutex state machine
//!
//! ```text
//! Idle -> NodeCreated -> Ranking -> Acquired
//!                          |  ^
//!                          v  |
//!                        Waiting
//! ```
//!
//! Any failure after the queue entry exists deletes that entry before the
//! error is returned, and so does dropping an `acquire` future mid-wait.
//! Nothing is retried.

use crate::error::LockError;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use zkl_adapters::{CoordinationAdapter, CoordinationError};
use zkl_core::{sort_children, LockKey, PathError, QueueNode};

/// Handle to a held lock: the full path of the holder's queue entry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    /// Rebuild a token from a queue-entry path, e.g. one printed earlier
    pub fn from_path(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        QueueNode::parse(&path)?;
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_path(self) -> String {
        self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acquire/release engine over a coordination adapter
///
/// Holds no local state: every call owns a disjoint queue entry, so clones
/// can be used from any number of tasks at once.
#[derive(Clone)]
pub struct DistributedMutex<C> {
    client: C,
}

impl<C: CoordinationAdapter> DistributedMutex<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Join the queue for `key` and wait until first in line
    ///
    /// With `wait` set, gives up once that much time has passed in total and
    /// returns [`LockError::AcquireTimeout`]. A zero wait ranks exactly once.
    pub async fn acquire(
        &self,
        key: &LockKey,
        wait: Option<Duration>,
    ) -> Result<LockToken, LockError> {
        let deadline = wait.map(|w| Instant::now() + w);

        let created = self
            .client
            .create_ephemeral_sequential(key.as_str())
            .await?;
        tracing::debug!(key = %key, node = %created, "queue entry created");
        // Removes the entry if this future is dropped while waiting
        let entry = PendingEntry::new(self.client.clone(), created);

        match self.wait_for_turn(key, entry.path(), deadline, wait).await {
            Ok(()) => {
                let created = entry.disarm();
                tracing::info!(key = %key, token = %created, "lock acquired");
                Ok(LockToken(created))
            }
            Err(e) => {
                entry.discard().await;
                Err(e)
            }
        }
    }

    /// Delete the holder's queue entry
    ///
    /// Returns `false` if the entry was already gone (released before, or lost
    /// with its session).
    pub async fn release(&self, token: LockToken) -> Result<bool, LockError> {
        match self.client.delete(token.as_str()).await {
            Ok(()) => {
                tracing::info!(token = %token, "lock released");
                Ok(true)
            }
            Err(CoordinationError::NoNode(_)) => {
                tracing::warn!(token = %token, "lock already released");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether any contender is queued on `key` right now
    ///
    /// A snapshot: the queue may change as soon as this returns.
    pub async fn has_key(&self, key: &LockKey) -> Result<bool, LockError> {
        let base = key.base_path();
        if !self.client.exists(base).await? {
            return Ok(false);
        }
        match self.client.list_children(base).await {
            Ok(children) => Ok(!children.is_empty()),
            Err(CoordinationError::NoNode(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Full paths of every queued contender on `key`, holder first
    pub async fn participants(&self, key: &LockKey) -> Result<Vec<String>, LockError> {
        let children = match self.client.list_children(key.base_path()).await {
            Ok(children) => children,
            Err(CoordinationError::NoNode(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(sort_children(children)?
            .iter()
            .map(|name| key.child_path(name))
            .collect())
    }

    async fn wait_for_turn(
        &self,
        key: &LockKey,
        created: &str,
        deadline: Option<Instant>,
        wait: Option<Duration>,
    ) -> Result<(), LockError> {
        let node = QueueNode::parse(created)?;

        loop {
            let (rank, queue) = self.rank(&node).await?;
            if rank == 0 {
                return Ok(());
            }

            if let (Some(deadline), Some(waited)) = (deadline, wait) {
                if Instant::now() >= deadline {
                    tracing::warn!(key = %key, node = created, rank, "gave up waiting for lock");
                    return Err(LockError::AcquireTimeout {
                        key: key.to_string(),
                        waited,
                    });
                }
            }

            let predecessor = node.key().child_path(&queue[rank - 1]);
            let watch = match self.client.watch_once(&predecessor).await {
                Ok(watch) => watch,
                // Left between listing and watching
                Err(CoordinationError::NoNode(_)) => continue,
                Err(e) => return Err(LockError::during_acquire(created, e)),
            };
            tracing::debug!(node = created, rank, predecessor = %predecessor, "waiting");

            let fired = match deadline {
                None => Some(watch.wait().await),
                Some(deadline) => tokio::time::timeout_at(deadline, watch.wait()).await.ok(),
            };
            match fired {
                Some(Ok(event)) => {
                    tracing::debug!(node = created, kind = ?event.kind, "predecessor changed")
                }
                Some(Err(e)) => return Err(LockError::during_acquire(created, e)),
                None => tracing::debug!(node = created, "wait deadline reached"),
            }
        }
    }

    /// Position of `node` in its numerically sorted queue
    ///
    /// A listing that lacks the node is re-read once before the entry is
    /// declared missing.
    async fn rank(&self, node: &QueueNode) -> Result<(usize, Vec<String>), LockError> {
        for attempt in 0..2 {
            let queue = match self.client.list_children(node.base_path()).await {
                Ok(children) => sort_children(children)?,
                Err(CoordinationError::NoNode(_)) => Vec::new(),
                Err(e) => return Err(LockError::during_acquire(&node.path(), e)),
            };
            if let Some(rank) = queue.iter().position(|name| name == node.name()) {
                return Ok((rank, queue));
            }
            tracing::debug!(node = %node.path(), attempt, "own entry missing from listing");
        }
        Err(LockError::SelfNodeMissing { node: node.path() })
    }
}

/// Queue entry of an acquire still in flight
///
/// Deleted on every way out except success: explicitly on error, and from a
/// spawned task when the acquire future is dropped mid-wait.
struct PendingEntry<C: CoordinationAdapter> {
    client: C,
    path: Option<String>,
}

impl<C: CoordinationAdapter> PendingEntry<C> {
    fn new(client: C, path: String) -> Self {
        Self {
            client,
            path: Some(path),
        }
    }

    fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }

    /// Keep the entry: it is now the lock token
    fn disarm(mut self) -> String {
        self.path.take().unwrap_or_default()
    }

    async fn discard(mut self) {
        if let Some(path) = self.path.take() {
            discard(&self.client, &path).await;
        }
    }
}

impl<C: CoordinationAdapter> Drop for PendingEntry<C> {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!(node = %path, "acquire cancelled, removing queue entry");
                let client = self.client.clone();
                handle.spawn(async move { discard(&client, &path).await });
            }
            // Lingers until the session ends
            Err(_) => tracing::warn!(node = %path, "no runtime to remove abandoned queue entry"),
        }
    }
}

/// Best-effort removal of an abandoned queue entry
async fn discard<C: CoordinationAdapter>(client: &C, node: &str) {
    match client.delete(node).await {
        Ok(()) => tracing::debug!(node, "queue entry removed"),
        Err(CoordinationError::NoNode(_)) => {}
        Err(e) => tracing::warn!(node, error = %e, "failed to remove queue entry"),
    }
}

#[cfg(test)]
#[path = "mutex_tests.rs"]
mod tests;
