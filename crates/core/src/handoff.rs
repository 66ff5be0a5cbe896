// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context handoffs between agents.

use crate::agent::AgentName;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a handoff request.
    pub struct HandoffId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    Pending,
    Accepted,
}

/// A context transfer request from one agent to another.
///
/// Creation also delivers a `handoff`-kind message to the recipient so it
/// learns the id to accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handoff {
    pub id: HandoffId,
    pub from: AgentName,
    pub to: AgentName,
    pub context: String,
    pub created_at_ms: u64,
    pub status: HandoffStatus,
}
