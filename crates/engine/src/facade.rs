// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application-facing lock surface

use crate::bootstrap::RootBootstrapper;
use crate::error::{BootstrapError, LockError};
use crate::mutex::{DistributedMutex, LockToken};
use async_trait::async_trait;
use std::time::Duration;
use zkl_adapters::CoordinationAdapter;
use zkl_core::LockKey;

/// Lock operations offered to application code
#[async_trait]
pub trait LockFacade: Send + Sync {
    /// Wait as long as it takes
    async fn acquire(&self, key: &LockKey) -> Result<LockToken, LockError>;

    /// Wait at most `wait`, failing with [`LockError::AcquireTimeout`]
    async fn acquire_timeout(&self, key: &LockKey, wait: Duration)
        -> Result<LockToken, LockError>;

    async fn has_key(&self, key: &LockKey) -> Result<bool, LockError>;

    async fn release(&self, token: LockToken) -> Result<bool, LockError>;
}

/// [`LockFacade`] backed by a [`DistributedMutex`]
#[derive(Clone)]
pub struct ZkLockFacade<C> {
    mutex: DistributedMutex<C>,
}

impl<C: CoordinationAdapter> ZkLockFacade<C> {
    /// Bootstrap every lock type's root, then hand out the facade
    pub async fn start(client: C) -> Result<Self, BootstrapError> {
        RootBootstrapper::new(client.clone()).ensure_all().await?;
        Ok(Self {
            mutex: DistributedMutex::new(client),
        })
    }

    pub fn mutex(&self) -> &DistributedMutex<C> {
        &self.mutex
    }
}

#[async_trait]
impl<C: CoordinationAdapter> LockFacade for ZkLockFacade<C> {
    async fn acquire(&self, key: &LockKey) -> Result<LockToken, LockError> {
        self.mutex.acquire(key, None).await
    }

    async fn acquire_timeout(
        &self,
        key: &LockKey,
        wait: Duration,
    ) -> Result<LockToken, LockError> {
        self.mutex.acquire(key, Some(wait)).await
    }

    async fn has_key(&self, key: &LockKey) -> Result<bool, LockError> {
        self.mutex.has_key(key).await
    }

    async fn release(&self, token: LockToken) -> Result<bool, LockError> {
        self.mutex.release(token).await
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
