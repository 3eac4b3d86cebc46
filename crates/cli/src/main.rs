// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zkl - distributed locks over ZooKeeper

mod client;
mod commands;
mod completions;
mod error;
mod output;

use clap::{Parser, Subcommand};
use commands::{bootstrap, config, lock, path};
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

/// Filter directives for stderr logging, e.g. `ZKL_LOG=zkl_engine=debug`
const LOG_ENV: &str = "ZKL_LOG";

#[derive(Parser)]
#[command(
    name = "zkl",
    version,
    about = "zkl - Distributed locks over ZooKeeper"
)]
struct Cli {
    /// Config file [default: <config dir>/zkl/config.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ZooKeeper connect string, overriding config and environment
    #[arg(long, global = true)]
    address: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the queue path of a lock key
    Path(lock::KeyArgs),
    /// Create the permanent root node of every lock type
    Bootstrap,
    /// Acquire a lock and hold it until released
    Acquire(lock::AcquireArgs),
    /// Run a command while holding a lock
    Run(lock::RunArgs),
    /// Check whether any contender is queued on a lock
    HasKey(lock::KeyArgs),
    /// Release a lock by its token
    Release(lock::ReleaseArgs),
    /// List contenders queued on a lock, holder first
    Queue(lock::KeyArgs),
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprint!("{}", error::report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        config: config_path,
        address,
        format,
        command,
    } = cli;

    let settings = || client::load_config(config_path.as_deref(), address.clone());

    match command {
        // Offline
        Commands::Path(args) => path::handle(args, format)?,
        Commands::Completions(args) => completions::generate_completions::<Cli>(args.shell),
        Commands::Config => config::handle(&settings()?, format)?,

        Commands::Bootstrap => bootstrap::handle(&settings()?, format).await?,
        Commands::Acquire(args) => lock::acquire(args, &settings()?, format).await?,
        Commands::Run(args) => return lock::run(args, &settings()?).await,
        Commands::HasKey(args) => lock::has_key(args, &settings()?, format).await?,
        Commands::Release(args) => lock::release(args, &settings()?, format).await?,
        Commands::Queue(args) => lock::queue(args, &settings()?, format).await?,
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
