// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messaging commands: send, inbox, read, clear, broadcast, share,
//! artifacts.

use super::{caller_identity, ProdEngine};
use crate::exit_error::{classify, validation};
use crate::table::{Column, Table};
use anyhow::Result;
use clap::Args;
use daedalos_core::{format_elapsed_ms, MessageKind, MessageState};
use daedalos_storage::MarkTarget;
use std::path::PathBuf;

#[derive(Args)]
pub struct SendArgs {
    /// Recipient (name, slot, or prefix)
    pub to: String,
    /// Message text
    pub message: String,
    /// Sender tag (defaults to $AGENT_NAME, then "user")
    #[arg(long)]
    pub from: Option<String>,
    /// Message kind
    #[arg(long = "type", default_value = "user")]
    pub kind: MessageKindArg,
}

/// Clap-friendly wrapper so `--type help_request` parses.
#[derive(Clone)]
pub struct MessageKindArg(pub MessageKind);

impl std::str::FromStr for MessageKindArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(MessageKindArg)
    }
}

#[derive(Args)]
pub struct InboxArgs {
    /// Agent whose queue to read
    pub agent: String,
    /// Only messages not yet marked read
    #[arg(long)]
    pub pending: bool,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Agent whose queue to mark
    pub agent: String,
    /// Message id (everything when omitted)
    pub id: Option<String>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Agent whose queue to clear
    pub agent: String,
}

#[derive(Args)]
pub struct BroadcastArgs {
    /// Message text
    pub message: String,
    /// Sender tag (defaults to $AGENT_NAME, then "user")
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Args)]
pub struct ShareArgs {
    /// File to publish
    pub file: PathBuf,
    /// Recipients (repeatable; everyone when omitted)
    #[arg(long = "to")]
    pub recipients: Vec<String>,
    /// Artifact name (file stem by default)
    #[arg(long)]
    pub name: Option<String>,
    /// Sharer (defaults to $AGENT_NAME, then "user")
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Args)]
pub struct ArtifactsArgs {
    /// Artifact name to show (all when omitted)
    pub name: Option<String>,
}

pub fn send(engine: &ProdEngine, args: SendArgs) -> Result<()> {
    let registry = engine.registry().map_err(classify)?;
    let to = engine.resolve(&registry, &args.to).map_err(classify)?;
    let from = caller_identity(args.from);
    let id = engine
        .messages()
        .send(
            &registry,
            &to,
            &from,
            args.kind.0,
            &args.message,
            engine.id_gen(),
            engine.epoch_ms(),
        )
        .map_err(|e| classify(e.into()))?;
    println!("sent {id} to {to}");
    Ok(())
}

pub fn inbox(engine: &ProdEngine, args: InboxArgs) -> Result<()> {
    let registry = engine.registry().map_err(classify)?;
    let agent = engine.resolve(&registry, &args.agent).map_err(classify)?;
    let messages = engine.messages().inbox(&agent, args.pending);
    if messages.is_empty() {
        println!("no messages");
        return Ok(());
    }
    let now = engine.epoch_ms();
    let mut table = Table::new(vec![
        Column::new("ID"),
        Column::new("AGE"),
        Column::new("FROM"),
        Column::new("TYPE"),
        Column::new("STATE"),
        Column::with_max("CONTENT", 60),
    ]);
    for message in messages {
        table.row(vec![
            message.id.short(8).to_string(),
            format_elapsed_ms(now, message.sent_at_ms),
            message.from.clone(),
            message.kind.to_string(),
            match message.state {
                MessageState::Pending => "pending".to_string(),
                MessageState::Read => "read".to_string(),
            },
            message.content.replace('\n', " "),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}

pub fn read(engine: &ProdEngine, args: ReadArgs) -> Result<()> {
    let registry = engine.registry().map_err(classify)?;
    let agent = engine.resolve(&registry, &args.agent).map_err(classify)?;
    let target = match args.id {
        // Ids render truncated in the inbox view, so match by prefix
        Some(prefix) => {
            let messages = engine.messages().inbox(&agent, false);
            let id = messages
                .iter()
                .map(|m| &m.id)
                .find(|id| id.as_str().starts_with(&prefix))
                .cloned()
                .ok_or_else(|| validation(format!("no message matching {prefix:?}")))?;
            MarkTarget::One(id)
        }
        None => MarkTarget::All,
    };
    let changed = engine
        .messages()
        .mark_read(&agent, target)
        .map_err(|e| classify(e.into()))?;
    println!("marked {changed} message(s) read");
    Ok(())
}

pub fn clear(engine: &ProdEngine, args: ClearArgs) -> Result<()> {
    let registry = engine.registry().map_err(classify)?;
    let agent = engine.resolve(&registry, &args.agent).map_err(classify)?;
    let removed = engine
        .messages()
        .clear(&agent)
        .map_err(|e| classify(e.into()))?;
    println!("cleared {removed} read message(s)");
    Ok(())
}

pub fn broadcast(engine: &ProdEngine, args: BroadcastArgs) -> Result<()> {
    let registry = engine.registry().map_err(classify)?;
    let from = caller_identity(args.from);
    let ids = engine
        .messages()
        .broadcast(
            &registry,
            &from,
            &args.message,
            engine.id_gen(),
            engine.epoch_ms(),
        )
        .map_err(|e| classify(e.into()))?;
    println!("broadcast to {} agent(s)", ids.len());
    Ok(())
}

pub fn share(engine: &ProdEngine, args: ShareArgs) -> Result<()> {
    let registry = engine.registry().map_err(classify)?;
    let from_str = caller_identity(args.from);
    let from = daedalos_core::AgentName::parse(&from_str)
        .map_err(|e| validation(format!("sharer must be an agent: {e}")))?;
    let recipients = args
        .recipients
        .iter()
        .map(|r| engine.resolve(&registry, r))
        .collect::<daedalos_engine::Result<Vec<_>>>()
        .map_err(classify)?;
    let name = engine
        .artifacts()
        .publish(
            &registry,
            &engine.messages(),
            &from,
            &args.file,
            &recipients,
            args.name.as_deref(),
            engine.id_gen(),
            engine.epoch_ms(),
        )
        .map_err(|e| classify(e.into()))?;
    println!("shared as {name}");
    Ok(())
}

pub fn artifacts(engine: &ProdEngine, args: ArtifactsArgs) -> Result<()> {
    match args.name {
        Some(name) => {
            let Some((meta, content)) = engine.artifacts().get(&name) else {
                return Err(validation(format!("unknown artifact: {name}")));
            };
            println!("name:      {}", meta.name);
            println!("shared_by: {}", meta.shared_by);
            println!("original:  {}", meta.original_path.display());
            println!("content:   {}", content.display());
            if !meta.recipients.is_empty() {
                let names: Vec<&str> = meta.recipients.iter().map(|a| a.as_str()).collect();
                println!("recipients: {}", names.join(", "));
            }
            Ok(())
        }
        None => {
            let metas = engine.artifacts().artifacts();
            if metas.is_empty() {
                println!("no artifacts");
                return Ok(());
            }
            let now = engine.epoch_ms();
            let mut table = Table::new(vec![
                Column::new("NAME"),
                Column::new("AGE"),
                Column::new("SHARED_BY"),
                Column::with_max("ORIGINAL", 50),
            ]);
            for meta in metas {
                table.row(vec![
                    meta.name.clone(),
                    format_elapsed_ms(now, meta.shared_at_ms),
                    meta.shared_by.to_string(),
                    meta.original_path.display().to_string(),
                ]);
            }
            print!("{}", table.render());
            Ok(())
        }
    }
}
