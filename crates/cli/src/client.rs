// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration resolution and session setup for commands

use crate::error::CliError;
use std::path::{Path, PathBuf};
use zkl_adapters::{TracedCoordinationAdapter, ZkAdapter, ZkClient};
use zkl_core::{ConfigError, ZkConfig};
use zkl_engine::{LockError, ZkLockFacade};

/// Adapter stack every command runs against
pub type Adapter = TracedCoordinationAdapter<ZkAdapter>;

/// Config file used when `--config` is not given
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zkl").join("config.toml"))
}

/// Effective configuration: file, then environment, then `--address`
pub fn load_config(explicit: Option<&Path>, address: Option<String>) -> Result<ZkConfig, CliError> {
    resolve_config(
        explicit,
        default_config_path(),
        |name| std::env::var(name).ok(),
        address,
    )
    .map_err(CliError::config)
}

fn resolve_config(
    explicit: Option<&Path>,
    fallback: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
    address: Option<String>,
) -> Result<ZkConfig, ConfigError> {
    let config = match (explicit, fallback.filter(|path| path.exists())) {
        (Some(path), _) => ZkConfig::load(path)?,
        (None, Some(path)) => {
            tracing::debug!(path = %path.display(), "using default config file");
            ZkConfig::load(&path)?
        }
        (None, None) => ZkConfig::default(),
    };

    let mut config = config.apply_env_with(lookup)?;
    if let Some(address) = address {
        config.address = address;
        config.validate()?;
    }
    Ok(config)
}

/// One live session, closed explicitly when the command is done
pub struct Session {
    client: ZkClient,
    adapter: Adapter,
    address: String,
}

impl Session {
    pub async fn connect(config: &ZkConfig) -> Result<Self, CliError> {
        let client = ZkClient::connect(config)
            .await
            .map_err(|e| CliError::coordination_unavailable(&config.address, e))?;
        let adapter = TracedCoordinationAdapter::new(ZkAdapter::new(client.clone()));
        Ok(Self {
            client,
            adapter,
            address: config.address.clone(),
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Lock facade with every root bootstrapped
    pub async fn facade(&self) -> Result<ZkLockFacade<Adapter>, CliError> {
        ZkLockFacade::start(self.adapter.clone())
            .await
            .map_err(|e| CliError::bootstrap(&self.address, e))
    }

    pub fn lock_error(&self, err: LockError) -> CliError {
        CliError::lock(&self.address, err)
    }

    /// Close the session; its ephemeral nodes go with it
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            tracing::warn!(error = %e, "failed to close session");
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
