// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bootstrap command

use crate::client::Session;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use serde::Serialize;
use std::fmt;
use zkl_core::{LockType, ZkConfig};
use zkl_engine::RootBootstrapper;

#[derive(Serialize)]
struct RootStatus {
    lock_type: String,
    root: &'static str,
    created: bool,
}

impl fmt::Display for RootStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.created { "created" } else { "present" };
        write!(f, "{:<24} {:<8} {}", self.root, status, self.lock_type)
    }
}

pub async fn handle(config: &ZkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let session = Session::connect(config).await?;
    let bootstrapper = RootBootstrapper::new(session.adapter().clone());

    let mut statuses = Vec::new();
    for lock_type in LockType::ALL {
        match bootstrapper.ensure_root(lock_type).await {
            Ok(created) => statuses.push(RootStatus {
                lock_type: lock_type.to_string(),
                root: lock_type.root(),
                created,
            }),
            Err(e) => {
                let err = CliError::bootstrap(session.address(), e);
                session.close().await;
                return Err(err.into());
            }
        }
    }
    session.close().await;

    output::print_list(&statuses, "", format)
}
