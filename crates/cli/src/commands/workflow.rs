// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow commands.

use super::{parse_duration, ProdEngine};
use crate::exit_error::classify;
use crate::table::{Column, Table};
use anyhow::Result;
use clap::{Args, Subcommand};
use daedalos_core::{format_elapsed_ms, FailureStrategy};
use daedalos_engine::WorkflowOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommand,
}

#[derive(Subcommand)]
pub enum WorkflowCommand {
    /// List workflow definitions from the playbook
    List,
    /// Show one workflow definition
    Show {
        name: String,
    },
    /// Start a workflow and drive it to completion
    Start {
        /// Workflow name
        name: String,
        /// The task all stage prompts receive as {task}
        task: String,
        /// Project directory stage agents run in
        #[arg(long, default_value = ".")]
        project: PathBuf,
        /// What to do when a stage fails: retry, skip, abort, fallback
        #[arg(long = "on-failure", default_value = "abort")]
        strategy: StrategyArg,
        /// Per-stage wait in sequential runs
        #[arg(long, default_value = "10m", value_parser = parse_duration)]
        stage_timeout: Duration,
        /// Overall wait in parallel runs
        #[arg(long, default_value = "15m", value_parser = parse_duration)]
        parallel_timeout: Duration,
    },
    /// Show instance status (all instances when no id)
    Status {
        id: Option<String>,
    },
    /// Kill every stage agent and mark the instance stopped
    Stop {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

/// Clap-friendly failure strategy wrapper.
#[derive(Clone)]
pub struct StrategyArg(pub FailureStrategy);

impl std::str::FromStr for StrategyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(StrategyArg)
    }
}

pub async fn run(engine: &ProdEngine, args: WorkflowArgs) -> Result<()> {
    match args.command {
        WorkflowCommand::List => {
            let playbook = engine.playbook().map_err(classify)?;
            let mut table = Table::new(vec![
                Column::new("NAME"),
                Column::new("MODE"),
                Column::new("STAGES"),
                Column::with_max("DESCRIPTION", 50),
            ]);
            for def in playbook.workflows() {
                table.row(vec![
                    def.name.clone(),
                    if def.parallel { "parallel" } else { "sequential" }.to_string(),
                    def.stages.len().to_string(),
                    def.description.clone(),
                ]);
            }
            if table.is_empty() {
                println!("no workflows defined");
            } else {
                print!("{}", table.render());
            }
            Ok(())
        }
        WorkflowCommand::Show { name } => {
            let playbook = engine.playbook().map_err(classify)?;
            let def = playbook.workflow(&name).map_err(|e| classify(e.into()))?;
            println!("name:     {}", def.name);
            if !def.description.is_empty() {
                println!("about:    {}", def.description);
            }
            println!(
                "mode:     {}",
                if def.parallel { "parallel" } else { "sequential" }
            );
            for stage in &def.stages {
                let pass = stage
                    .pass_to_next
                    .as_deref()
                    .map(|k| format!(" -> {{{k}}}"))
                    .unwrap_or_default();
                println!("  stage {} [{}]{}", stage.name, stage.template, pass);
            }
            Ok(())
        }
        WorkflowCommand::Start {
            name,
            task,
            project,
            strategy,
            stage_timeout,
            parallel_timeout,
        } => {
            let project = std::fs::canonicalize(&project).unwrap_or(project);
            let instance = engine
                .workflow_start(&name, &task, &project)
                .map_err(classify)?;
            println!("instance {} ({} stages)", instance.id, instance.stages.len());
            let opts = WorkflowOptions {
                strategy: strategy.0,
                stage_timeout,
                parallel_timeout,
                ..WorkflowOptions::default()
            };
            let status = engine
                .workflow_drive(&instance.id, &opts)
                .await
                .map_err(classify)?;
            println!("instance {} finished: {status}", instance.id);
            if status == daedalos_core::InstanceStatus::Failed {
                return Err(crate::exit_error::timeout(format!(
                    "workflow {} failed",
                    instance.id
                )));
            }
            Ok(())
        }
        WorkflowCommand::Status { id } => {
            let instances = engine.workflow_status(id.as_deref()).map_err(classify)?;
            if id.is_some() {
                if let Some(one) = instances.first() {
                    println!("id:       {}", one.id);
                    println!("workflow: {}", one.workflow);
                    println!("status:   {}", one.status);
                    println!("task:     {}", one.task);
                    for stage in &one.stages {
                        let done = one.stage_outputs.contains_key(stage);
                        let agent = one
                            .agents_by_stage
                            .get(stage)
                            .map(|a| format!(" ({a})"))
                            .unwrap_or_default();
                        println!("  [{}] {}{}", if done { "x" } else { " " }, stage, agent);
                    }
                }
                return Ok(());
            }
            if instances.is_empty() {
                println!("no workflow instances");
                return Ok(());
            }
            let now = engine.epoch_ms();
            let mut table = Table::new(vec![
                Column::new("ID"),
                Column::new("WORKFLOW"),
                Column::new("STATUS"),
                Column::new("AGE"),
                Column::with_max("TASK", 40),
            ]);
            for instance in instances {
                table.row(vec![
                    instance.id.short(12).to_string(),
                    instance.workflow.clone(),
                    instance.status.to_string(),
                    format_elapsed_ms(now, instance.started_at_ms),
                    instance.task.clone(),
                ]);
            }
            print!("{}", table.render());
            Ok(())
        }
        WorkflowCommand::Stop { id, force } => {
            let instance = engine.workflow_stop(&id, force).await.map_err(classify)?;
            println!("stopped {}", instance.id);
            Ok(())
        }
    }
}
