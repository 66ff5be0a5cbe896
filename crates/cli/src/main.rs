// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! daedalos - multi-agent orchestration CLI

mod commands;
mod exit_error;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{claim, handoff, hook, lifecycle, lock, messaging, signal, workflow};
use daedalos_engine::Engine;
use daedalos_storage::DataRoot;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "daedalos",
    version,
    about = "Daedalos - coordinated coding agents in tmux sessions"
)]
struct Cli {
    /// Data root override (defaults to $DAEDALOS_DATA_ROOT, then the
    /// platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn a new agent
    Spawn(lifecycle::SpawnArgs),
    /// Kill an agent (graceful interrupt first unless --force)
    Kill(lifecycle::KillArgs),
    /// Stop an agent's process without killing the session
    Pause(lifecycle::IdArg),
    /// Continue a paused agent
    Resume(lifecycle::IdArg),
    /// Attach to an agent's session
    Focus(lifecycle::IdArg),
    /// Print the tail of an agent's scrollback without attaching
    Peek(lifecycle::PeekArgs),
    /// List agents with live statuses
    List,
    /// Show one agent (or everything) in detail
    Status(lifecycle::StatusArgs),
    /// Capture agent state (registry record, scrollback, git diff)
    Snapshot(lifecycle::SnapshotArgs),
    /// Re-create agents from a snapshot
    Restore(lifecycle::RestoreArgs),

    /// Send a message to an agent's queue
    Send(messaging::SendArgs),
    /// Read an agent's message queue
    Inbox(messaging::InboxArgs),
    /// Mark messages as read
    Read(messaging::ReadArgs),
    /// Drop read messages, keeping pending ones
    Clear(messaging::ClearArgs),
    /// Send a message to every other agent
    Broadcast(messaging::BroadcastArgs),
    /// Publish a file into the shared namespace
    Share(messaging::ShareArgs),
    /// List shared artifacts (or show one)
    Artifacts(messaging::ArtifactsArgs),

    /// Completion signals
    Signal(signal::SignalArgs),
    /// Advisory locks
    Lock(lock::LockArgs),
    /// Task claims
    Claim(claim::ClaimArgs),
    /// Context handoffs
    Handoff(handoff::HandoffArgs),
    /// Multi-stage workflows
    Workflow(workflow::WorkflowArgs),
    /// Lifecycle hook scripts
    Hook(hook::HookArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("DAEDALOS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = cli
        .data_root
        .map(DataRoot::new)
        .unwrap_or_else(DataRoot::discover);
    let engine = Engine::production(root).map_err(exit_error::classify)?;

    match cli.command {
        Commands::Spawn(args) => lifecycle::spawn(&engine, args).await,
        Commands::Kill(args) => lifecycle::kill(&engine, args).await,
        Commands::Pause(args) => lifecycle::pause(&engine, args).await,
        Commands::Resume(args) => lifecycle::resume(&engine, args).await,
        Commands::Focus(args) => lifecycle::focus(&engine, args).await,
        Commands::Peek(args) => lifecycle::peek(&engine, args).await,
        Commands::List => lifecycle::list(&engine).await,
        Commands::Status(args) => lifecycle::status(&engine, args).await,
        Commands::Snapshot(args) => lifecycle::snapshot(&engine, args).await,
        Commands::Restore(args) => lifecycle::restore(&engine, args).await,
        Commands::Send(args) => messaging::send(&engine, args),
        Commands::Inbox(args) => messaging::inbox(&engine, args),
        Commands::Read(args) => messaging::read(&engine, args),
        Commands::Clear(args) => messaging::clear(&engine, args),
        Commands::Broadcast(args) => messaging::broadcast(&engine, args),
        Commands::Share(args) => messaging::share(&engine, args),
        Commands::Artifacts(args) => messaging::artifacts(&engine, args),
        Commands::Signal(args) => signal::run(&engine, args).await,
        Commands::Lock(args) => lock::run(&engine, args).await,
        Commands::Claim(args) => claim::run(&engine, args),
        Commands::Handoff(args) => handoff::run(&engine, args),
        Commands::Workflow(args) => workflow::run(&engine, args).await,
        Commands::Hook(args) => hook::run(&engine, args),
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped to avoid noisy duplicates (common with
/// thiserror's `#[error("... {0}")]` + `#[from]` pattern).
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
