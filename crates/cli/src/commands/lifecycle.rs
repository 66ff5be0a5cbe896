// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle commands: spawn, kill, pause, resume, focus, peek, list,
//! status, snapshot, restore.

use super::{parse_key_value, ProdEngine};
use crate::exit_error::classify;
use crate::table::{Column, Table};
use anyhow::Result;
use clap::Args;
use daedalos_core::format_elapsed_ms;
use daedalos_engine::{SnapshotTarget, SpawnOptions};
use std::path::PathBuf;

#[derive(Args)]
pub struct SpawnArgs {
    /// Agent name (1-32 chars, letter first, then letters/digits/_/-)
    pub name: String,
    /// Project directory the session is rooted at
    #[arg(long, default_value = ".")]
    pub project: PathBuf,
    /// Template to build the invocation from
    #[arg(long, default_value = "default")]
    pub template: String,
    /// Explicit slot (lowest free by default)
    #[arg(long)]
    pub slot: Option<u32>,
    /// Initial prompt to send once the session settles
    #[arg(long)]
    pub prompt: Option<String>,
    /// Extra environment (repeatable: --env KEY=VALUE)
    #[arg(long = "env", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,
    /// Attach to the new session (only when already inside one)
    #[arg(long)]
    pub focus: bool,
}

#[derive(Args)]
pub struct KillArgs {
    /// Agent name, slot, or prefix
    pub id: String,
    /// Skip the graceful interrupt
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Agent name, slot, or prefix
    pub id: String,
}

#[derive(Args)]
pub struct PeekArgs {
    /// Agent name, slot, or prefix
    pub id: String,
    /// Number of trailing lines to capture
    #[arg(short = 'n', long, default_value = "50")]
    pub lines: u32,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Agent name, slot, or prefix (all agents when omitted)
    pub id: Option<String>,
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Agent to capture (all agents when omitted)
    pub agent: Option<String>,
    /// Label stored with the snapshot
    #[arg(long)]
    pub label: Option<String>,
    /// List existing snapshots instead of taking one
    #[arg(long)]
    pub list: bool,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Snapshot id
    pub id: String,
    /// Restore only this agent
    #[arg(long)]
    pub agent: Option<String>,
    /// Don't attach to the first restored agent
    #[arg(long)]
    pub no_focus: bool,
}

pub async fn spawn(engine: &ProdEngine, args: SpawnArgs) -> Result<()> {
    let project = std::fs::canonicalize(&args.project).unwrap_or(args.project.clone());
    let record = engine
        .spawn(
            &args.name,
            &project,
            SpawnOptions {
                template: args.template,
                slot: args.slot,
                prompt: args.prompt,
                env: args.env,
                focus: args.focus,
            },
        )
        .await
        .map_err(classify)?;
    println!(
        "spawned {} (slot {}, session {})",
        record.name, record.slot, record.session
    );
    Ok(())
}

pub async fn kill(engine: &ProdEngine, args: KillArgs) -> Result<()> {
    engine.kill(&args.id, args.force).await.map_err(classify)?;
    println!("killed {}", args.id);
    Ok(())
}

pub async fn pause(engine: &ProdEngine, args: IdArg) -> Result<()> {
    engine.pause(&args.id).await.map_err(classify)?;
    println!("paused {}", args.id);
    Ok(())
}

pub async fn resume(engine: &ProdEngine, args: IdArg) -> Result<()> {
    engine.resume(&args.id).await.map_err(classify)?;
    println!("resumed {}", args.id);
    Ok(())
}

pub async fn focus(engine: &ProdEngine, args: IdArg) -> Result<()> {
    engine.focus(&args.id).await.map_err(classify)?;
    Ok(())
}

pub async fn peek(engine: &ProdEngine, args: PeekArgs) -> Result<()> {
    let scrollback = engine.peek(&args.id, args.lines).await.map_err(classify)?;
    print!("{scrollback}");
    Ok(())
}

pub async fn list(engine: &ProdEngine) -> Result<()> {
    let records = engine.list_agents().await.map_err(classify)?;
    if records.is_empty() {
        println!("no agents");
        return Ok(());
    }
    let now = engine.epoch_ms();
    let mut table = Table::new(vec![
        Column::new("SLOT"),
        Column::new("NAME"),
        Column::new("STATUS"),
        Column::new("ACTIVE"),
        Column::new("TEMPLATE"),
        Column::with_max("PROJECT", 40),
    ]);
    for record in records {
        table.row(vec![
            record.slot.to_string(),
            record.name.to_string(),
            record.status.to_string(),
            format_elapsed_ms(now, record.last_activity_ms),
            record.template.clone(),
            record.project.display().to_string(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}

pub async fn status(engine: &ProdEngine, args: StatusArgs) -> Result<()> {
    match args.id {
        None => list(engine).await,
        Some(id) => {
            let record = engine.agent_status(&id).await.map_err(classify)?;
            println!("name:     {}", record.name);
            println!("slot:     {}", record.slot);
            println!("status:   {}", record.status);
            println!("session:  {}", record.session);
            println!("pid:      {}", record.child_pid);
            println!("template: {}", record.template);
            println!("project:  {}", record.project.display());
            println!(
                "active:   {} ago",
                format_elapsed_ms(engine.epoch_ms(), record.last_activity_ms)
            );
            Ok(())
        }
    }
}

pub async fn snapshot(engine: &ProdEngine, args: SnapshotArgs) -> Result<()> {
    if args.list {
        let snapshots = engine.snapshots().list();
        if snapshots.is_empty() {
            println!("no snapshots");
            return Ok(());
        }
        let now = engine.epoch_ms();
        let mut table = Table::new(vec![
            Column::new("ID"),
            Column::new("AGE"),
            Column::new("AGENTS"),
            Column::with_max("LABEL", 40),
        ]);
        for meta in snapshots {
            let agents: Vec<&str> = meta.agents.iter().map(|a| a.as_str()).collect();
            table.row(vec![
                meta.id.to_string(),
                format_elapsed_ms(now, meta.created_at_ms),
                agents.join(","),
                meta.label.unwrap_or_default(),
            ]);
        }
        print!("{}", table.render());
        return Ok(());
    }

    let target = match args.agent {
        Some(agent) => SnapshotTarget::One(agent),
        None => SnapshotTarget::All,
    };
    let id = engine.snapshot(target, args.label).await.map_err(classify)?;
    println!("snapshot {id}");
    Ok(())
}

pub async fn restore(engine: &ProdEngine, args: RestoreArgs) -> Result<()> {
    let restored = engine
        .restore(&args.id, args.agent.as_deref(), !args.no_focus)
        .await
        .map_err(classify)?;
    if restored.is_empty() {
        println!("nothing restored (agents still live?)");
    } else {
        let names: Vec<&str> = restored.iter().map(|a| a.as_str()).collect();
        println!("restored {}", names.join(", "));
    }
    Ok(())
}
