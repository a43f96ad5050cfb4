// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ql exec <key> -- <command>...` - Run a command under the lock

use super::lock;
use anyhow::{Context, Result};
use clap::Args;
use ql_core::LockContext;
use ql_engine::DistributedLock;
use std::process::{ExitCode, ExitStatus};
use std::time::Duration;
use tokio::process::Command;

#[derive(Args)]
pub struct ExecArgs {
    /// Lock key held while the command runs
    pub key: String,

    /// Command and its arguments. The lease should outlast it.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Acquire, run, release. Exits with the command's status; a failed release
/// is reported but does not change it.
///
/// Cancelling `session` interrupts the acquire only. The release runs under
/// its own context so an interrupted command still gives the lock back.
pub async fn exec(
    lock: &dyn DistributedLock,
    session: &LockContext,
    args: ExecArgs,
    timeout: Duration,
) -> Result<ExitCode> {
    let (program, program_args) = args
        .command
        .split_first()
        .context("no command given")?;

    lock::acquire(lock, session, &args.key, timeout).await?;
    tracing::debug!(key = %args.key, program = %program, "lock held, starting command");

    let outcome = run_command(program, program_args).await;

    let release_parent = LockContext::background();
    if let Err(e) = lock::release(lock, &release_parent, &args.key, timeout).await {
        // Stores that still hold the key drop it when the lease runs out
        tracing::warn!(key = %args.key, error = %e, "release after command failed");
        eprintln!("Warning: {e:#}");
    }

    Ok(exit_code(outcome?))
}

async fn run_command(program: &str, args: &[String]) -> Result<ExitStatus> {
    let mut child = Command::new(program)
        .args(args)
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    tokio::select! {
        status = child.wait() => Ok(status?),
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!(program, "interrupted, stopping command");
            let _ = child.start_kill();
            Ok(child.wait().await?)
        }
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from)
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
