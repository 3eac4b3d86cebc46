// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock commands: acquire, run, has-key, release, queue

use crate::client::{Adapter, Session};
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use zkl_core::{LockKey, LockType, QueueNode, ZkConfig};
use zkl_engine::{LockFacade, LockToken, ZkLockFacade};

/// Environment variable carrying the token into `zkl run` children
pub const TOKEN_ENV: &str = "ZKL_LOCK_TOKEN";

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Lock type: receive-quantity or release-coupon-stock
    pub lock_type: LockType,

    /// Business keys, outermost first
    #[arg(required = true)]
    pub keys: Vec<String>,
}

impl KeyArgs {
    pub fn lock_key(&self) -> Result<LockKey, CliError> {
        LockKey::new(self.lock_type, &self.keys).map_err(CliError::invalid_key)
    }
}

#[derive(Args, Debug)]
pub struct AcquireArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Give up after this long, e.g. "500ms" or "5s" [default: wait forever]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub wait: Option<Duration>,

    /// Release after this long [default: hold until Ctrl-C]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub hold: Option<Duration>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Give up after this long [default: wait forever]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub wait: Option<Duration>,

    /// Command to run while the lock is held
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Token printed by `zkl acquire`
    pub token: String,
}

#[derive(Serialize)]
struct TokenInfo {
    token: String,
    sequence: u64,
}

impl TokenInfo {
    fn new(token: &LockToken) -> Self {
        Self {
            token: token.to_string(),
            sequence: QueueNode::parse(token.as_str()).map_or(0, |node| node.sequence()),
        }
    }
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

#[derive(Serialize)]
struct Participant {
    rank: usize,
    token: String,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = if self.rank == 0 { "holder" } else { "waiting" };
        write!(f, "{:>3}  {:<8} {}", self.rank, role, self.token)
    }
}

#[derive(Serialize)]
struct Occupancy {
    key: String,
    held: bool,
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.held)
    }
}

#[derive(Serialize)]
struct Released {
    token: String,
    released: bool,
}

impl fmt::Display for Released {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.released {
            write!(f, "released {}", self.token)
        } else {
            write!(f, "already released {}", self.token)
        }
    }
}

async fn acquire_token(
    session: &Session,
    facade: &ZkLockFacade<Adapter>,
    key: &LockKey,
    wait: Option<Duration>,
) -> Result<LockToken, CliError> {
    let result = match wait {
        Some(wait) => facade.acquire_timeout(key, wait).await,
        None => facade.acquire(key).await,
    };
    result.map_err(|e| session.lock_error(e))
}

async fn release_token(
    session: &Session,
    facade: &ZkLockFacade<Adapter>,
    token: LockToken,
) -> Result<(), CliError> {
    let printable = token.to_string();
    let released = facade
        .release(token)
        .await
        .map_err(|e| session.lock_error(e))?;
    if !released {
        tracing::warn!(token = %printable, "lock entry was already gone; session may have expired");
    }
    Ok(())
}

/// Ctrl-C notifications for the rest of the process
///
/// Once installed, an interrupt no longer kills the process; each stage of a
/// command decides what it means.
fn trap_interrupts() -> anyhow::Result<UnboundedReceiver<()>> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })?;
    Ok(rx)
}

/// Run `work` unless an interrupt arrives first, in which case `work` is dropped
async fn until_interrupted<F: Future>(
    work: F,
    interrupts: &mut UnboundedReceiver<()>,
) -> Option<F::Output> {
    tokio::select! {
        output = work => Some(output),
        Some(()) = interrupts.recv() => None,
    }
}

/// Wait for the lock; an interrupt abandons the wait and its queue entry
///
/// The dropped acquire removes the entry, and closing the session afterwards
/// removes it regardless.
async fn acquire_interruptible(
    session: &Session,
    facade: &ZkLockFacade<Adapter>,
    key: &LockKey,
    wait: Option<Duration>,
    interrupts: &mut UnboundedReceiver<()>,
) -> Result<LockToken, CliError> {
    until_interrupted(acquire_token(session, facade, key, wait), interrupts)
        .await
        .unwrap_or_else(|| Err(CliError::interrupted(key.as_str())))
}

pub async fn acquire(
    args: AcquireArgs,
    config: &ZkConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let key = args.key.lock_key()?;
    let session = Session::connect(config).await?;
    let result = hold(&session, &key, &args, format).await;
    session.close().await;
    result
}

async fn hold(
    session: &Session,
    key: &LockKey,
    args: &AcquireArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut interrupts = trap_interrupts()?;
    let facade = session.facade().await?;
    let token = acquire_interruptible(session, &facade, key, args.wait, &mut interrupts).await?;
    output::print(&TokenInfo::new(&token), format)?;

    match args.hold {
        Some(duration) => {
            if until_interrupted(tokio::time::sleep(duration), &mut interrupts)
                .await
                .is_none()
            {
                tracing::info!(token = %token, "interrupted, releasing early");
            }
        }
        None => {
            eprintln!("holding lock; press Ctrl-C to release");
            interrupts.recv().await;
        }
    }

    release_token(session, &facade, token).await?;
    Ok(())
}

pub async fn run(args: RunArgs, config: &ZkConfig) -> anyhow::Result<ExitCode> {
    let key = args.key.lock_key()?;
    let session = Session::connect(config).await?;
    let result = run_locked(&session, &key, &args).await;
    session.close().await;
    result
}

async fn run_locked(session: &Session, key: &LockKey, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let Some((program, program_args)) = args.command.split_first() else {
        anyhow::bail!("no command given");
    };

    let mut interrupts = trap_interrupts()?;
    let facade = session.facade().await?;
    let token = acquire_interruptible(session, &facade, key, args.wait, &mut interrupts).await?;
    // From here Ctrl-C reaches the child; the trapped copy only keeps this
    // process alive to release once the child exits
    tracing::info!(token = %token, program = %program, "running command under lock");

    let status = tokio::process::Command::new(program)
        .args(program_args)
        .env(TOKEN_ENV, token.as_str())
        .status()
        .await;

    release_token(session, &facade, token).await?;

    let status = status.with_context(|| format!("failed to run '{}'", program))?;
    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        // Killed by a signal
        None => ExitCode::FAILURE,
    })
}

pub async fn has_key(args: KeyArgs, config: &ZkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let key = args.lock_key()?;
    let session = Session::connect(config).await?;
    let result = async {
        let facade = session.facade().await?;
        let held = facade
            .has_key(&key)
            .await
            .map_err(|e| session.lock_error(e))?;
        Ok::<_, CliError>(Occupancy {
            key: key.to_string(),
            held,
        })
    }
    .await;
    session.close().await;

    output::print(&result?, format)
}

pub async fn release(
    args: ReleaseArgs,
    config: &ZkConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let token = LockToken::from_path(args.token.as_str())
        .map_err(|e| CliError::invalid_token(&args.token, e))?;
    let session = Session::connect(config).await?;
    let result = async {
        let facade = session.facade().await?;
        facade
            .release(token)
            .await
            .map_err(|e| session.lock_error(e))
    }
    .await;
    session.close().await;

    output::print(
        &Released {
            token: args.token,
            released: result?,
        },
        format,
    )
}

pub async fn queue(args: KeyArgs, config: &ZkConfig, format: OutputFormat) -> anyhow::Result<()> {
    let key = args.lock_key()?;
    let session = Session::connect(config).await?;
    let result = async {
        let facade = session.facade().await?;
        facade
            .mutex()
            .participants(&key)
            .await
            .map_err(|e| session.lock_error(e))
    }
    .await;
    session.close().await;

    let participants: Vec<Participant> = result?
        .into_iter()
        .enumerate()
        .map(|(rank, token)| Participant { rank, token })
        .collect();
    output::print_list(&participants, "no contenders", format)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
