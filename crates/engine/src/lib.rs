// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Distributed mutex over a coordination service
//!
//! Contenders queue up as ephemeral sequential nodes under the lock's base
//! path; the lowest sequence number holds the lock and every other contender
//! watches the entry directly ahead of it.

mod bootstrap;
mod error;
mod facade;
mod mutex;

pub use bootstrap::RootBootstrapper;
pub use error::{BootstrapError, LockError};
pub use facade::{LockFacade, ZkLockFacade};
pub use mutex::{DistributedMutex, LockToken};
