// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zkl-core: shared vocabulary for the zkl distributed lock
//!
//! This crate provides:
//! - The closed set of lock types and their permanent root segments
//! - The lock path codec (lock keys, queue-entry nodes, sequence parsing)
//! - Coordination-service client configuration

pub mod config;
pub mod lock_type;
pub mod path;

pub use config::{ConfigError, RetryConfig, ZkConfig};
pub use lock_type::LockType;
pub use path::{
    build_path, sequence_number, sort_children, split_full_path, LockKey, PathError, QueueNode,
    PATH_SEPARATOR, QUEUE_PREFIX,
};
