// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error says what went wrong, why it might have happened, and how to
//! fix it.

use std::fmt;
use std::time::Duration;
use zkl_adapters::CoordinationError;
use zkl_core::{config::ADDRESS_ENV, ConfigError, PathError};
use zkl_engine::{BootstrapError, LockError};

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures operators actually hit.
impl CliError {
    /// A business key that cannot form a lock path
    pub fn invalid_key(err: PathError) -> Self {
        CliError::new("Invalid lock key")
            .with_context(err.to_string())
            .with_suggestion("Business keys must be non-empty and must not contain '/'")
            .with_suggestion("Business keys must not start with 'lock-'")
            .with_source(err)
    }

    /// A token that is not a queue-entry path
    pub fn invalid_token(token: &str, err: PathError) -> Self {
        CliError::new(format!("'{}' is not a lock token", token))
            .with_context(err.to_string())
            .with_suggestion("Pass the token printed by: zkl acquire")
            .with_suggestion("List queued tokens with: zkl queue <TYPE> <KEYS>...")
            .with_source(err)
    }

    pub fn config(err: ConfigError) -> Self {
        CliError::new("Failed to load configuration")
            .with_context(err.to_string())
            .with_suggestion("Check the file passed to --config")
            .with_suggestion("Print the effective configuration: zkl config")
            .with_source(err)
    }

    /// Session could not be established or was lost
    pub fn coordination_unavailable(address: &str, err: CoordinationError) -> Self {
        CliError::new(format!("Cannot reach ZooKeeper at '{}'", address))
            .with_context(err.to_string())
            .with_suggestion("Check that the ensemble is running and reachable")
            .with_suggestion("Override the address: zkl --address <HOST:PORT> ...")
            .with_suggestion(format!("Or set {}", ADDRESS_ENV))
            .with_source(err)
    }

    pub fn lock_timeout(key: &str, waited: Duration) -> Self {
        CliError::new(format!("Timed out waiting for lock '{}'", key))
            .with_context(format!(
                "Still not first in line after {}",
                humantime::format_duration(waited)
            ))
            .with_suggestion("See who holds the lock: zkl queue <TYPE> <KEYS>...")
            .with_suggestion("Wait longer with --wait, or omit it to wait indefinitely")
    }

    /// Ctrl-C while still queued
    pub fn interrupted(key: &str) -> Self {
        CliError::new(format!("Interrupted while waiting for lock '{}'", key))
            .with_context("The queue entry was removed; the lock was never held")
    }

    pub fn bootstrap(address: &str, err: BootstrapError) -> Self {
        let BootstrapError::Root { source, .. } = &err;
        if source.is_unavailable() {
            return CliError::coordination_unavailable(address, source.clone());
        }
        CliError::new("Failed to create lock roots")
            .with_context(err.to_string())
            .with_suggestion("Check the session's ACL permits creating top-level nodes")
            .with_source(err)
    }

    /// Map an engine error for display
    pub fn lock(address: &str, err: LockError) -> Self {
        match err {
            LockError::AcquireTimeout { key, waited } => CliError::lock_timeout(&key, waited),
            LockError::CoordinationUnavailable(source) => {
                CliError::coordination_unavailable(address, source)
            }
            LockError::InvalidPath(source) => CliError::invalid_key(source),
            LockError::SelfNodeMissing { node } => {
                CliError::new(format!("Queue entry '{}' disappeared", node))
                    .with_context("The session may have expired while waiting")
                    .with_suggestion("Retry the command")
            }
            other => CliError::new("Lock operation failed")
                .with_context(other.to_string())
                .with_source(other),
        }
    }
}

/// Render any error for stderr, with suggestions where available
pub fn report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CliError>() {
        Some(cli) => cli.to_string(),
        None => format!("error: {:#}\n", err),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
