// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ZooKeeper coordination adapter
//!
//! The client library is synchronous, so every round trip runs on the
//! blocking pool.

use super::{CoordinationAdapter, CoordinationError, Watch, WatchEvent, WatchEventKind};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zkl_core::ZkConfig;
use zookeeper::{
    Acl, CreateMode, WatchedEvent, WatchedEventType, ZkError, ZkResult, ZkState, ZooKeeper,
    ZooKeeperExt,
};

/// Process-wide session handle
///
/// Cheap to clone; all clones share one session. Open with [`ZkClient::connect`]
/// and tear down with [`ZkClient::close`].
#[derive(Clone)]
pub struct ZkClient {
    zk: Arc<ZooKeeper>,
    namespace: Namespace,
}

impl ZkClient {
    /// Open a session and wait until it is connected
    ///
    /// Retries with exponential backoff per `config.retry`, then makes sure
    /// the namespace node exists.
    pub async fn connect(config: &ZkConfig) -> Result<Self, CoordinationError> {
        let mut attempt = 0;
        let zk = loop {
            let address = config.address.clone();
            let timeout = config.session_timeout;
            match run_blocking(move || open_session(&address, timeout)).await {
                Ok(zk) => break zk,
                Err(e) if attempt < config.retry.max_retries => {
                    let delay = config.retry.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "connect failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let client = Self {
            zk: Arc::new(zk),
            namespace: Namespace::new(config.chroot()),
        };

        if let Some(root) = client.namespace.root.clone() {
            let zk = Arc::clone(&client.zk);
            run_blocking(move || zk.ensure_path(&root).map_err(|e| map_zk_error(&root, e)))
                .await?;
        }

        tracing::info!(
            address = %config.address,
            namespace = %config.namespace,
            "connected to coordination service"
        );
        Ok(client)
    }

    /// Close the session. Every ephemeral node it owns is removed by the service.
    pub async fn close(&self) -> Result<(), CoordinationError> {
        let zk = Arc::clone(&self.zk);
        run_blocking(move || zk.close().map_err(|e| map_zk_error("/", e))).await?;
        tracing::info!("coordination session closed");
        Ok(())
    }
}

/// Coordination adapter over a [`ZkClient`] session
#[derive(Clone)]
pub struct ZkAdapter {
    client: ZkClient,
}

impl ZkAdapter {
    pub fn new(client: ZkClient) -> Self {
        Self { client }
    }

    async fn call<T, F>(&self, path: &str, op: F) -> Result<T, CoordinationError>
    where
        T: Send + 'static,
        F: FnOnce(&ZooKeeper, &str) -> ZkResult<T> + Send + 'static,
    {
        let zk = Arc::clone(&self.client.zk);
        let absolute = self.client.namespace.absolute(path);
        let shown = path.to_string();
        run_blocking(move || op(&zk, &absolute).map_err(|e| map_zk_error(&shown, e))).await
    }
}

#[async_trait]
impl CoordinationAdapter for ZkAdapter {
    async fn create_ephemeral_sequential(&self, path: &str) -> Result<String, CoordinationError> {
        let created = self
            .call(path, |zk, path| {
                ensure_parent(zk, path)?;
                zk.create(
                    path,
                    Vec::new(),
                    Acl::open_unsafe().clone(),
                    CreateMode::EphemeralSequential,
                )
            })
            .await?;
        Ok(self.client.namespace.relative(&created))
    }

    async fn create_persistent(&self, path: &str) -> Result<(), CoordinationError> {
        self.call(path, |zk, path| {
            ensure_parent(zk, path)?;
            zk.create(
                path,
                Vec::new(),
                Acl::open_unsafe().clone(),
                CreateMode::Persistent,
            )
            .map(|_| ())
        })
        .await
    }

    async fn delete(&self, path: &str) -> Result<(), CoordinationError> {
        self.call(path, |zk, path| zk.delete(path, None)).await
    }

    async fn exists(&self, path: &str) -> Result<bool, CoordinationError> {
        self.call(path, |zk, path| zk.exists(path, false).map(|stat| stat.is_some()))
            .await
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        self.call(path, |zk, path| zk.get_children(path, false))
            .await
    }

    async fn watch_once(&self, path: &str) -> Result<Watch, CoordinationError> {
        let (trigger, watch) = Watch::channel(path);
        let trigger = Mutex::new(Some(trigger));
        let watched = path.to_string();

        self.call(path, move |zk, path| {
            zk.get_data_w(path, move |event: WatchedEvent| {
                let slot = trigger.lock().unwrap_or_else(|e| e.into_inner()).take();
                if let Some(trigger) = slot {
                    trigger.fire(WatchEvent {
                        path: watched.clone(),
                        kind: event_kind(event.event_type),
                    });
                }
            })
            .map(|_| ())
        })
        .await?;

        Ok(watch)
    }
}

/// Path prefix applied to every node this process touches
#[derive(Clone, Debug, PartialEq, Eq)]
struct Namespace {
    root: Option<String>,
}

impl Namespace {
    fn new(root: Option<String>) -> Self {
        Self { root }
    }

    fn absolute(&self, path: &str) -> String {
        match &self.root {
            Some(root) if path == "/" => root.clone(),
            Some(root) => format!("{}{}", root, path),
            None => path.to_string(),
        }
    }

    fn relative(&self, path: &str) -> String {
        match &self.root {
            Some(root) => path
                .strip_prefix(root.as_str())
                .filter(|rest| rest.starts_with('/'))
                .unwrap_or(path)
                .to_string(),
            None => path.to_string(),
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, CoordinationError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CoordinationError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoordinationError::Unavailable(format!("client task failed: {}", e)))?
}

fn open_session(address: &str, timeout: Duration) -> Result<ZooKeeper, CoordinationError> {
    let zk = ZooKeeper::connect(address, timeout, |event: WatchedEvent| {
        tracing::trace!(state = ?event.keeper_state, "session event");
    })
    .map_err(|e| map_zk_error(address, e))?;
    zk.add_listener(log_state_change);

    // Round trip to confirm the session is usable
    if let Err(e) = zk.exists("/", false) {
        let _ = zk.close();
        return Err(map_zk_error(address, e));
    }
    Ok(zk)
}

fn log_state_change(state: ZkState) {
    match state {
        ZkState::Connected | ZkState::ConnectedReadOnly => {
            tracing::info!(?state, "session connected")
        }
        ZkState::Closed => tracing::warn!("session closed, ephemeral lock entries are gone"),
        other => tracing::debug!(state = ?other, "session state changed"),
    }
}

fn ensure_parent(zk: &ZooKeeper, path: &str) -> ZkResult<()> {
    match path.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => zk.ensure_path(parent),
        _ => Ok(()),
    }
}

fn event_kind(event_type: WatchedEventType) -> WatchEventKind {
    match event_type {
        WatchedEventType::NodeDeleted => WatchEventKind::Deleted,
        WatchedEventType::NodeDataChanged => WatchEventKind::DataChanged,
        _ => WatchEventKind::Other,
    }
}

fn map_zk_error(path: &str, err: ZkError) -> CoordinationError {
    match err {
        ZkError::NoNode => CoordinationError::NoNode(path.to_string()),
        ZkError::NodeExists => CoordinationError::NodeExists(path.to_string()),
        ZkError::ConnectionLoss | ZkError::SessionExpired | ZkError::OperationTimeout => {
            CoordinationError::Unavailable(format!("{:?} at {}", err, path))
        }
        other => CoordinationError::NodeState {
            path: path.to_string(),
            reason: format!("{:?}", other),
        },
    }
}

#[cfg(test)]
#[path = "zk_tests.rs"]
mod tests;
