// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context handoff commands.

use super::{caller_identity, ProdEngine};
use crate::exit_error::{classify, validation};
use crate::table::{Column, Table};
use anyhow::Result;
use clap::{Args, Subcommand};
use daedalos_core::{format_elapsed_ms, AgentName, HandoffId, HandoffStatus};

#[derive(Args)]
pub struct HandoffArgs {
    #[command(subcommand)]
    pub command: HandoffCommand,
}

#[derive(Subcommand)]
pub enum HandoffCommand {
    /// Hand context to another agent (delivers a handoff message)
    Create {
        /// Recipient (name, slot, or prefix)
        to: String,
        /// The context to transfer
        context: String,
        /// Sender (defaults to $AGENT_NAME)
        #[arg(long)]
        from: Option<String>,
    },
    /// Accept a pending handoff addressed to you; prints the context
    Accept {
        /// Handoff id (from the notification message)
        id: String,
        /// Accepting agent (defaults to $AGENT_NAME)
        #[arg(long)]
        agent: Option<String>,
    },
    /// List handoffs
    List,
}

fn participant(explicit: Option<String>) -> Result<AgentName> {
    let identity = caller_identity(explicit);
    AgentName::parse(&identity)
        .map_err(|e| validation(format!("handoff participant must be an agent: {e}")))
}

pub fn run(engine: &ProdEngine, args: HandoffArgs) -> Result<()> {
    match args.command {
        HandoffCommand::Create { to, context, from } => {
            let registry = engine.registry().map_err(classify)?;
            let to = engine.resolve(&registry, &to).map_err(classify)?;
            let from = participant(from)?;
            let id = engine
                .handoffs()
                .create(
                    &registry,
                    &engine.messages(),
                    &from,
                    &to,
                    &context,
                    engine.id_gen(),
                    engine.epoch_ms(),
                )
                .map_err(|e| classify(e.into()))?;
            println!("handoff {id} -> {to}");
            Ok(())
        }
        HandoffCommand::Accept { id, agent } => {
            let agent = participant(agent)?;
            let context = engine
                .handoffs()
                .accept(&HandoffId::new(id), &agent)
                .map_err(|e| classify(e.into()))?;
            println!("{context}");
            Ok(())
        }
        HandoffCommand::List => {
            let handoffs = engine.handoffs().list();
            if handoffs.is_empty() {
                println!("no handoffs");
                return Ok(());
            }
            let now = engine.epoch_ms();
            let mut table = Table::new(vec![
                Column::new("ID"),
                Column::new("AGE"),
                Column::new("FROM"),
                Column::new("TO"),
                Column::new("STATUS"),
            ]);
            for handoff in handoffs {
                table.row(vec![
                    handoff.id.short(8).to_string(),
                    format_elapsed_ms(now, handoff.created_at_ms),
                    handoff.from.to_string(),
                    handoff.to.to_string(),
                    match handoff.status {
                        HandoffStatus::Pending => "pending".to_string(),
                        HandoffStatus::Accepted => "accepted".to_string(),
                    },
                ]);
            }
            print!("{}", table.render());
            Ok(())
        }
    }
}
