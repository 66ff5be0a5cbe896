// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory lock commands.

use super::{caller_identity, parse_duration, ProdEngine};
use crate::exit_error::{classify, timeout};
use crate::table::{Column, Table};
use anyhow::Result;
use clap::{Args, Subcommand};
use daedalos_core::format_elapsed_ms;
use std::time::Duration;

#[derive(Args)]
pub struct LockArgs {
    #[command(subcommand)]
    pub command: LockCommand,
}

#[derive(Subcommand)]
pub enum LockCommand {
    /// Acquire a lock, waiting up to --timeout (exit 1 on timeout)
    Acquire {
        /// Lock name (e.g. db-schema)
        name: String,
        /// Owner tag (defaults to $AGENT_NAME, then "user")
        #[arg(long)]
        owner: Option<String>,
        /// How long to keep trying; 0 means one attempt
        #[arg(long, default_value = "30s", value_parser = parse_duration)]
        timeout: Duration,
    },
    /// Release a lock you hold
    Release {
        name: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Whether a lock is currently held
    Check {
        name: String,
    },
    /// List held locks
    List,
}

pub async fn run(engine: &ProdEngine, args: LockArgs) -> Result<()> {
    match args.command {
        LockCommand::Acquire {
            name,
            owner,
            timeout: budget,
        } => {
            let owner = caller_identity(owner);
            let acquired = engine
                .acquire_lock(&name, &owner, budget, Duration::from_millis(250))
                .await
                .map_err(classify)?;
            if !acquired {
                return Err(timeout(format!(
                    "lock {name:?} not acquired within {}s",
                    budget.as_secs()
                )));
            }
            println!("acquired {name}");
            Ok(())
        }
        LockCommand::Release { name, owner } => {
            let owner = caller_identity(owner);
            engine
                .locks()
                .release(&name, &owner)
                .map_err(|e| classify(e.into()))?;
            println!("released {name}");
            Ok(())
        }
        LockCommand::Check { name } => {
            match engine.locks().info(&name) {
                Some(info) => println!("{}: held by {} (pid {})", name, info.owner, info.holder_pid),
                None if engine.locks().check(&name) => println!("{name}: held"),
                None => println!("{name}: free"),
            }
            Ok(())
        }
        LockCommand::List => {
            let locks = engine.locks().list();
            if locks.is_empty() {
                println!("no locks held");
                return Ok(());
            }
            let now = engine.epoch_ms();
            let mut table = Table::new(vec![
                Column::new("NAME"),
                Column::new("OWNER"),
                Column::new("PID"),
                Column::new("HELD"),
            ]);
            for info in locks {
                table.row(vec![
                    info.name.clone(),
                    info.owner.clone(),
                    info.holder_pid.to_string(),
                    format_elapsed_ms(now, info.acquired_at_ms),
                ]);
            }
            print!("{}", table.render());
            Ok(())
        }
    }
}
