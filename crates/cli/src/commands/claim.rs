// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task claim commands.

use super::{caller_identity, ProdEngine};
use crate::exit_error::{classify, validation};
use crate::table::{Column, Table};
use anyhow::Result;
use clap::{Args, Subcommand};
use daedalos_core::{format_elapsed_ms, AgentName, ClaimStatus};

#[derive(Args)]
pub struct ClaimArgs {
    #[command(subcommand)]
    pub command: ClaimCommand,
}

#[derive(Subcommand)]
pub enum ClaimCommand {
    /// Claim a task (idempotent for the same owner)
    Create {
        /// Task identifier
        task_id: String,
        /// What the task is about
        #[arg(long, default_value = "")]
        description: String,
        /// Claiming agent (defaults to $AGENT_NAME)
        #[arg(long)]
        agent: Option<String>,
    },
    /// Release a claim, archiving it with a final status
    Release {
        task_id: String,
        /// completed, abandoned, or failed
        #[arg(long, default_value = "completed")]
        status: ClaimStatusArg,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Whether a task is claimed, and by whom
    Check {
        task_id: String,
    },
    /// List active claims
    List,
}

/// Clap-friendly claim status wrapper.
#[derive(Clone)]
pub struct ClaimStatusArg(pub ClaimStatus);

impl std::str::FromStr for ClaimStatusArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ClaimStatusArg)
    }
}

fn claiming_agent(explicit: Option<String>) -> Result<AgentName> {
    let identity = caller_identity(explicit);
    AgentName::parse(&identity).map_err(|e| validation(format!("claimant must be an agent: {e}")))
}

pub fn run(engine: &ProdEngine, args: ClaimArgs) -> Result<()> {
    match args.command {
        ClaimCommand::Create {
            task_id,
            description,
            agent,
        } => {
            let agent = claiming_agent(agent)?;
            let claim = engine
                .claims()
                .create(&task_id, &agent, &description, engine.epoch_ms())
                .map_err(|e| classify(e.into()))?;
            println!("claimed {} for {}", claim.task_id, claim.agent);
            Ok(())
        }
        ClaimCommand::Release {
            task_id,
            status,
            agent,
        } => {
            let agent = claiming_agent(agent)?;
            let claim = engine
                .claims()
                .release(&task_id, &agent, status.0, engine.epoch_ms())
                .map_err(|e| classify(e.into()))?;
            println!("released {} as {}", claim.task_id, claim.status);
            Ok(())
        }
        ClaimCommand::Check { task_id } => {
            match engine.claims().get(&task_id) {
                Some(claim) => println!("{}: claimed by {}", task_id, claim.agent),
                None => println!("{task_id}: unclaimed"),
            }
            Ok(())
        }
        ClaimCommand::List => {
            let claims = engine.claims().list();
            if claims.is_empty() {
                println!("no active claims");
                return Ok(());
            }
            let now = engine.epoch_ms();
            let mut table = Table::new(vec![
                Column::new("TASK"),
                Column::new("AGENT"),
                Column::new("AGE"),
                Column::with_max("DESCRIPTION", 50),
            ]);
            for claim in claims {
                table.row(vec![
                    claim.task_id.clone(),
                    claim.agent.to_string(),
                    format_elapsed_ms(now, claim.claimed_at_ms),
                    claim.description.clone(),
                ]);
            }
            print!("{}", table.render());
            Ok(())
        }
    }
}
