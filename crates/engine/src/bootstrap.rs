// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permanent root nodes, one per lock type

use crate::error::BootstrapError;
use zkl_adapters::{CoordinationAdapter, CoordinationError};
use zkl_core::LockType;

/// Creates the permanent root of each lock type before any lock is taken
#[derive(Clone)]
pub struct RootBootstrapper<C> {
    client: C,
}

impl<C: CoordinationAdapter> RootBootstrapper<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Ensure the root of `lock_type` exists
    ///
    /// Returns `true` if this call created it. Losing a creation race to
    /// another process counts as success.
    pub async fn ensure_root(&self, lock_type: LockType) -> Result<bool, BootstrapError> {
        let root = lock_type.root();
        let fail = |source| BootstrapError::Root {
            lock_type,
            root: root.to_string(),
            source,
        };

        if self.client.exists(root).await.map_err(fail)? {
            tracing::debug!(%lock_type, root, "root already present");
            return Ok(false);
        }
        match self.client.create_persistent(root).await {
            Ok(()) => {
                tracing::info!(%lock_type, root, "root created");
                Ok(true)
            }
            Err(CoordinationError::NodeExists(_)) => Ok(false),
            Err(e) => Err(fail(e)),
        }
    }

    /// Ensure every lock type's root, stopping at the first failure
    pub async fn ensure_all(&self) -> Result<(), BootstrapError> {
        for lock_type in LockType::ALL {
            self.ensure_root(lock_type).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
