// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination-service client configuration
//!
//! Read from the `[zookeeper]` table of a TOML file:
//!
//! ```toml
//! [zookeeper]
//! address = "zk1:2181,zk2:2181"
//! namespace = "marketing_lock_namespace"
//! session_timeout = "30s"
//!
//! [zookeeper.retry]
//! base_sleep = "1s"
//! max_retries = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the connect string
pub const ADDRESS_ENV: &str = "ZKL_ZOOKEEPER_ADDRESS";

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Backoff policy used while establishing the session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Sleep before the first retry; doubles on each further attempt
    #[serde(with = "humantime_serde")]
    pub base_sleep: Duration,
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_sleep: Duration::from_secs(1),
            max_retries: 3,
        }
    }
}

impl RetryConfig {
    /// Sleep before retry number `attempt` (zero-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_sleep
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZkConfig {
    /// Comma-separated `host:port` list
    pub address: String,
    /// Top-level node all lock paths live under; empty for none
    pub namespace: String,
    #[serde(with = "humantime_serde")]
    pub session_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ZkConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:2181".to_string(),
            namespace: "marketing_lock_namespace".to_string(),
            session_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    zookeeper: ZkConfig,
}

impl ZkConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Load from a TOML file, then validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse TOML text, then validate
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        file.zookeeper.validate()?;
        Ok(file.zookeeper)
    }

    /// Apply the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup` (environment-shaped)
    pub fn apply_env_with(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(address) = lookup(ADDRESS_ENV) {
            tracing::debug!(address, "address overridden from environment");
            self.address = address;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::Invalid("address must not be empty".to_string()));
        }
        if self.namespace.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "namespace '{}' must be a single path segment",
                self.namespace
            )));
        }
        if self.session_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "session_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Path prefix applied to every node, e.g. `/marketing_lock_namespace`
    pub fn chroot(&self) -> Option<String> {
        (!self.namespace.is_empty()).then(|| format!("/{}", self.namespace))
    }

    /// Render as a TOML document with a `[zookeeper]` table
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            zookeeper: self.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
