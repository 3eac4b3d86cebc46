// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the coordination service

pub mod coordination;
pub mod traced;

pub use coordination::{
    CoordinationAdapter, CoordinationError, Watch, WatchEvent, WatchEventKind, WatchTrigger,
    ZkAdapter, ZkClient,
};
pub use traced::TracedCoordinationAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use coordination::{CoordinationCall, FakeCoordinationAdapter};
