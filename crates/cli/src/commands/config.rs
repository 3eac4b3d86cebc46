// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config command

use crate::error::CliError;
use crate::output::OutputFormat;
use zkl_core::ZkConfig;

/// Print the configuration commands would connect with
pub fn handle(config: &ZkConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", config.to_toml().map_err(CliError::config)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}
