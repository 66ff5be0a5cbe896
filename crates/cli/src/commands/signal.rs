// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion-signal commands.

use super::{parse_duration, ProdEngine};
use crate::exit_error::{classify, timeout, validation};
use anyhow::Result;
use clap::{Args, Subcommand};
use daedalos_core::{AgentName, SignalStatus};
use std::time::Duration;

#[derive(Args)]
pub struct SignalArgs {
    #[command(subcommand)]
    pub command: SignalCommand,
}

#[derive(Subcommand)]
pub enum SignalCommand {
    /// Write (or overwrite) an agent's completion signal
    Complete {
        /// Agent name (usually $AGENT_NAME)
        agent: String,
        /// success, failure, or blocked
        #[arg(long, default_value = "success")]
        status: StatusArg,
        /// Payload: an output path or a short summary
        #[arg(long)]
        data: Option<String>,
    },
    /// Block until an agent signals (exit 1 on timeout)
    Wait {
        /// Agents to wait for (all must signal)
        #[arg(required = true)]
        agents: Vec<String>,
        /// Wait budget (e.g. 30s, 10m)
        #[arg(long, default_value = "10m", value_parser = parse_duration)]
        timeout: Duration,
        /// Poll interval
        #[arg(long, default_value = "250", value_name = "MS")]
        poll_ms: u64,
    },
    /// Show an agent's signal, if any
    Check {
        agent: String,
    },
    /// Remove an agent's signal
    Clear {
        agent: String,
    },
}

/// Clap-friendly status wrapper.
#[derive(Clone)]
pub struct StatusArg(pub SignalStatus);

impl std::str::FromStr for StatusArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(StatusArg)
    }
}

fn agent_name(s: &str) -> Result<AgentName> {
    AgentName::parse(s).map_err(|e| validation(e.to_string()))
}

pub async fn run(engine: &ProdEngine, args: SignalArgs) -> Result<()> {
    match args.command {
        SignalCommand::Complete {
            agent,
            status,
            data,
        } => {
            let agent = agent_name(&agent)?;
            engine
                .complete(&agent, status.0, data)
                .await
                .map_err(classify)?;
            println!("signaled {} for {agent}", status.0);
            Ok(())
        }
        SignalCommand::Wait {
            agents,
            timeout: budget,
            poll_ms,
        } => {
            let agents = agents
                .iter()
                .map(|a| agent_name(a))
                .collect::<Result<Vec<_>>>()?;
            let poll = Duration::from_millis(poll_ms);
            let done = engine.wait_all(&agents, budget, poll).await;
            if !done {
                return Err(timeout(format!(
                    "wait timed out after {}s",
                    budget.as_secs()
                )));
            }
            println!("all {} agent(s) signaled", agents.len());
            Ok(())
        }
        SignalCommand::Check { agent } => {
            let agent = agent_name(&agent)?;
            match engine.signals().get(&agent) {
                Some(signal) => {
                    println!(
                        "{}: {}{}",
                        agent,
                        signal.status,
                        signal
                            .data
                            .map(|d| format!(" ({d})"))
                            .unwrap_or_default()
                    );
                    Ok(())
                }
                None => Err(timeout(format!("no completion signal for {agent}"))),
            }
        }
        SignalCommand::Clear { agent } => {
            let agent = agent_name(&agent)?;
            engine.signals().clear(&agent)?;
            println!("cleared signal for {agent}");
            Ok(())
        }
    }
}
