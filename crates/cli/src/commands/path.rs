// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path command: show where a lock's queue lives, offline

use super::lock::KeyArgs;
use crate::output::{self, OutputFormat};
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
struct PathInfo {
    lock_type: String,
    root: &'static str,
    base_path: String,
    queue_prefix: String,
}

impl fmt::Display for PathInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.queue_prefix)
    }
}

pub fn handle(args: KeyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let key = args.lock_key()?;
    let info = PathInfo {
        lock_type: args.lock_type.to_string(),
        root: args.lock_type.root(),
        base_path: key.base_path().to_string(),
        queue_prefix: key.to_string(),
    };
    output::print(&info, format)
}
