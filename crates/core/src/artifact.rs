// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared artifact metadata.

use crate::agent::AgentName;
use serde::{Deserialize, Serialize};

/// Metadata for a file published into the shared namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Globally unique artifact name
    pub name: String,
    /// Where the file came from
    pub original_path: std::path::PathBuf,
    pub shared_by: AgentName,
    pub shared_at_ms: u64,
    /// Intended recipients; empty means every agent
    #[serde(default)]
    pub recipients: Vec<AgentName>,
}
