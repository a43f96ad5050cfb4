// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ql - quorum lock CLI

mod commands;
mod fleet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{exec, lock};
use fleet::FleetArgs;
use ql_core::LockContext;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "ql",
    version,
    about = "Quorum lock - mutual exclusion agreed by a majority of Redis stores"
)]
struct Cli {
    #[command(flatten)]
    fleet: FleetArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the lock on a key
    Acquire(lock::LockArgs),
    /// Give up the lock on a key
    Release(lock::LockArgs),
    /// Run a command while holding the lock on a key
    Exec(exec::ExecArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let redlock = cli.fleet.connect()?;
    let timeout = cli.fleet.timeout;

    // Ctrl-C cancels any round still waiting on the stores
    let session = LockContext::background();
    let interrupt = session.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Acquire(args) => {
            lock::acquire(&redlock, &session, &args.key, timeout).await?;
            println!("Acquired: {}", args.key);
        }
        Commands::Release(args) => {
            lock::release(&redlock, &session, &args.key, timeout).await?;
            println!("Released: {}", args.key);
        }
        Commands::Exec(args) => return exec::exec(&redlock, &session, args, timeout).await,
    }

    Ok(ExitCode::SUCCESS)
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
