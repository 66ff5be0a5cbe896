// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task claims: a lightweight mark that one agent owns a task.

use crate::agent::AgentName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Active,
    Completed,
    Abandoned,
    Failed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Active => "active",
            ClaimStatus::Completed => "completed",
            ClaimStatus::Abandoned => "abandoned",
            ClaimStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClaimStatus::Active),
            "completed" => Ok(ClaimStatus::Completed),
            "abandoned" => Ok(ClaimStatus::Abandoned),
            "failed" => Ok(ClaimStatus::Failed),
            other => Err(format!("unknown claim status: {other}")),
        }
    }
}

/// A claim on a named task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub task_id: String,
    pub agent: AgentName,
    pub description: String,
    pub claimed_at_ms: u64,
    pub status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at_ms: Option<u64>,
}

impl Claim {
    pub fn new(task_id: String, agent: AgentName, description: String, epoch_ms: u64) -> Self {
        Self {
            task_id,
            agent,
            description,
            claimed_at_ms: epoch_ms,
            status: ClaimStatus::Active,
            released_at_ms: None,
        }
    }
}
