// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion signals written by agents when they finish a task.

use crate::agent::AgentName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome an agent reports for its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Success,
    Failure,
    /// The agent cannot proceed without outside help. Never retried.
    Blocked,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Success => "success",
            SignalStatus::Failure => "failure",
            SignalStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SignalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(SignalStatus::Success),
            "failure" => Ok(SignalStatus::Failure),
            "blocked" => Ok(SignalStatus::Blocked),
            other => Err(format!("unknown signal status: {other}")),
        }
    }
}

/// The latest completion report for an agent.
///
/// Exactly one per agent; a retry overwrites the previous record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSignal {
    pub agent: AgentName,
    pub status: SignalStatus,
    /// Free-text payload, often an output-file path or a summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub signaled_at_ms: u64,
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
