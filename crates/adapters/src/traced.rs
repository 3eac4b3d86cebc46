// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::coordination::{CoordinationAdapter, CoordinationError, Watch};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any CoordinationAdapter
#[derive(Clone)]
pub struct TracedCoordinationAdapter<C> {
    inner: C,
}

impl<C> TracedCoordinationAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: CoordinationAdapter> CoordinationAdapter for TracedCoordinationAdapter<C> {
    async fn create_ephemeral_sequential(&self, path: &str) -> Result<String, CoordinationError> {
        let span = tracing::info_span!("zk.create_ephemeral_sequential", path);

        async {
            require_absolute(path)?;

            let start = std::time::Instant::now();
            let result = self.inner.create_ephemeral_sequential(path).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(node) => tracing::info!(
                    node = %node,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "queue entry created"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "create failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn create_persistent(&self, path: &str) -> Result<(), CoordinationError> {
        let span = tracing::info_span!("zk.create_persistent", path);

        async {
            require_absolute(path)?;

            let start = std::time::Instant::now();
            let result = self.inner.create_persistent(path).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "persistent node created"
                ),
                Err(CoordinationError::NodeExists(_)) => tracing::debug!("already exists"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "create failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, path: &str) -> Result<(), CoordinationError> {
        let span = tracing::info_span!("zk.delete", path);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.delete(path).await;
            let elapsed = start.elapsed();

            // delete() of an absent node is often expected (already released)
            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "deleted"),
                Err(CoordinationError::NoNode(_)) => tracing::debug!("already absent"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn exists(&self, path: &str) -> Result<bool, CoordinationError> {
        let result = self.inner.exists(path).await;
        tracing::trace!(path, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        let result = self.inner.list_children(path).await;
        tracing::trace!(
            path,
            count = result.as_ref().map(|v| v.len()).ok(),
            "listed children"
        );
        result
    }

    async fn watch_once(&self, path: &str) -> Result<Watch, CoordinationError> {
        let span = tracing::info_span!("zk.watch_once", path);

        async {
            let result = self.inner.watch_once(path).await;
            match &result {
                Ok(_) => tracing::debug!("watch registered"),
                Err(CoordinationError::NoNode(_)) => tracing::debug!("node already gone"),
                Err(e) => tracing::warn!(error = %e, "watch failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Precondition for every create: nodes live under an absolute parent
fn require_absolute(path: &str) -> Result<(), CoordinationError> {
    if path.starts_with('/') {
        return Ok(());
    }
    tracing::error!("path is not absolute");
    Err(CoordinationError::NodeState {
        path: path.to_string(),
        reason: "path must be absolute".to_string(),
    })
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
