// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent names, statuses, and registry records.
//!
//! An agent is one supervised interactive coding process. Its `AgentName` is
//! the handle everything else keys on: message queues, completion signals,
//! claims, and session names all derive from it. The registry record caches
//! the last detected status; liveness decisions always go back to the
//! session adapter.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

/// Maximum length of an agent name in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Default number of addressable slots (`1..=DEFAULT_MAX_SLOTS`).
pub const DEFAULT_MAX_SLOTS: u32 = 9;

/// Errors from agent name validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("invalid agent name {0:?}: must start with a letter and contain only letters, digits, '_' or '-'")]
    Invalid(String),
    #[error("agent name too long: {0} chars (max {MAX_NAME_LEN})")]
    TooLong(usize),
}

/// A validated agent name.
///
/// 1..=32 characters, first character an ASCII letter, the rest
/// `[A-Za-z0-9_-]`. Validation happens on construction and on
/// deserialization, so a name held by this type is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AgentName(String);

impl AgentName {
    pub fn parse(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong(name.len()));
        }
        let mut chars = name.chars();
        let valid_head = chars
            .next()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false);
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_head || !valid_tail {
            return Err(NameError::Invalid(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The deterministic session name for this agent (`agent-<name>`).
    pub fn session_name(&self) -> String {
        format!("agent-{}", self.0)
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AgentName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq<str> for AgentName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AgentName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for AgentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AgentName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

/// Cached status of an agent, refreshed on each inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Spawn settle window, before the first detection pass
    Starting,
    /// Running a tool or producing output
    Active,
    /// Long task or spinner visible
    Thinking,
    /// Blocked on an interactive yes/no prompt
    Waiting,
    /// Finished speaking, at the input prompt
    Idle,
    /// Process stopped via pause
    Paused,
    /// Recent output contains failure markers
    Error,
    /// Session no longer exists
    Dead,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Starting => "starting",
            AgentStatus::Active => "active",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Waiting => "waiting",
            AgentStatus::Idle => "idle",
            AgentStatus::Paused => "paused",
            AgentStatus::Error => "error",
            AgentStatus::Dead => "dead",
        }
    }

    /// Whether the underlying session is expected to exist.
    pub fn is_live(&self) -> bool {
        !matches!(self, AgentStatus::Dead)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The registry's record of one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name: AgentName,
    /// Human-friendly handle, unique among live agents, 1..=MAXSLOTS
    pub slot: u32,
    /// Absolute project directory the session is rooted at
    pub project: PathBuf,
    /// Template the invocation was built from
    pub template: String,
    /// Opaque session handle from the session adapter
    pub session: String,
    /// Main child PID inside the session; 0 until known
    #[serde(default)]
    pub child_pid: u32,
    pub created_at_ms: u64,
    pub last_activity_ms: u64,
    pub status: AgentStatus,
}

impl AgentRecord {
    pub fn new(name: AgentName, slot: u32, project: PathBuf, template: String, epoch_ms: u64) -> Self {
        let session = name.session_name();
        Self {
            name,
            slot,
            project,
            template,
            session,
            child_pid: 0,
            created_at_ms: epoch_ms,
            last_activity_ms: epoch_ms,
            status: AgentStatus::Starting,
        }
    }

    /// Update the activity timestamp.
    pub fn touch(&mut self, epoch_ms: u64) {
        self.last_activity_ms = epoch_ms;
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
