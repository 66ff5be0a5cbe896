// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot metadata.

use crate::agent::AgentName;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a snapshot.
    pub struct SnapshotId;
}

/// Top-level record of a snapshot: which agents it covers.
///
/// The per-agent captures (registry record, scrollback, optional diff) live
/// in one subdirectory per agent next to this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub id: SnapshotId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created_at_ms: u64,
    pub agents: Vec<AgentName>,
}
