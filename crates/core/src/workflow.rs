// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow instance state machine.
//!
//! A workflow instance is one scheduled run of a multi-stage plan. The
//! engine owns these records exclusively; agents are referenced by name and
//! resolved through the registry when needed.

use crate::agent::AgentName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for a workflow instance.
    pub struct InstanceId;
}

/// Terminal and non-terminal states of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Running,
    Completed,
    Failed,
    /// Finished, but at least one stage never produced a real output
    Partial,
    Stopped,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Running => "running",
            InstanceStatus::Completed => "completed",
            InstanceStatus::Failed => "failed",
            InstanceStatus::Partial => "partial",
            InstanceStatus::Stopped => "stopped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InstanceStatus::Running)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a stage reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Clear the signal, kill the stage agent, back off, re-spawn
    Retry,
    /// Record a skip marker and proceed to the next stage
    Skip,
    /// Mark the instance failed and stop
    #[default]
    Abort,
    /// Record a placeholder output and proceed
    Fallback,
}

impl FailureStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStrategy::Retry => "retry",
            FailureStrategy::Skip => "skip",
            FailureStrategy::Abort => "abort",
            FailureStrategy::Fallback => "fallback",
        }
    }
}

impl fmt::Display for FailureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FailureStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retry" => Ok(FailureStrategy::Retry),
            "skip" => Ok(FailureStrategy::Skip),
            "abort" => Ok(FailureStrategy::Abort),
            "fallback" => Ok(FailureStrategy::Fallback),
            other => Err(format!("unknown failure strategy: {other}")),
        }
    }
}

/// One scheduled run of a workflow.
///
/// `stage_outputs` and `agents_by_stage` preserve declaration order so
/// aggregation and status listings stay deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: InstanceId,
    /// Workflow definition name
    pub workflow: String,
    /// Free-text task given at start
    pub task: String,
    pub project: PathBuf,
    pub parallel: bool,
    /// Stage names in declaration order
    pub stages: Vec<String>,
    /// Index into `stages` (sequential runs only)
    pub current_stage: usize,
    pub stage_outputs: IndexMap<String, String>,
    pub agents_by_stage: IndexMap<String, AgentName>,
    pub status: InstanceStatus,
    pub started_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
}

impl WorkflowInstance {
    pub fn new(
        id: InstanceId,
        workflow: String,
        task: String,
        project: PathBuf,
        parallel: bool,
        stages: Vec<String>,
        epoch_ms: u64,
    ) -> Self {
        Self {
            id,
            workflow,
            task,
            project,
            parallel,
            stages,
            current_stage: 0,
            stage_outputs: IndexMap::new(),
            agents_by_stage: IndexMap::new(),
            status: InstanceStatus::Running,
            started_at_ms: epoch_ms,
            completed_at_ms: None,
        }
    }

    /// Record the agent spawned for a stage.
    pub fn set_stage_agent(&mut self, stage: &str, agent: AgentName) {
        self.agents_by_stage.insert(stage.to_string(), agent);
    }

    /// Record a stage's output text.
    pub fn record_output(&mut self, stage: &str, output: String) {
        self.stage_outputs.insert(stage.to_string(), output);
    }

    /// Transition to a terminal status, stamping completion time.
    pub fn finish(&mut self, status: InstanceStatus, epoch_ms: u64) {
        self.status = status;
        self.completed_at_ms = Some(epoch_ms);
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
