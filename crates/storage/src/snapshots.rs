// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence.
//!
//! Layout: `snapshots/<id>/meta.json` plus one directory per covered agent
//! holding `record.json`, `scrollback.txt`, and `diff.patch` when the
//! project had uncommitted changes. The engine drives capture and restore;
//! this module only knows the layout.

use crate::fs;
use crate::paths::DataRoot;
use daedalos_core::{AgentName, AgentRecord, SnapshotId, SnapshotMeta};

/// The snapshot namespace.
#[derive(Clone)]
pub struct SnapshotStore {
    root: DataRoot,
}

impl SnapshotStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    pub fn save_meta(&self, meta: &SnapshotMeta) -> std::io::Result<()> {
        fs::write_json(&self.root.snapshot_meta(&meta.id), meta)
    }

    pub fn load_meta(&self, id: &SnapshotId) -> Option<SnapshotMeta> {
        fs::read_json(&self.root.snapshot_meta(id))
    }

    /// All snapshots, newest first.
    pub fn list(&self) -> Vec<SnapshotMeta> {
        let Ok(entries) = std::fs::read_dir(self.root.snapshots_dir()) else {
            return Vec::new();
        };
        let mut metas: Vec<SnapshotMeta> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path().join("meta.json"))
            .filter_map(|p| fs::read_json(&p))
            .collect();
        metas.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        metas
    }

    pub fn save_record(
        &self,
        id: &SnapshotId,
        agent: &AgentName,
        record: &AgentRecord,
    ) -> std::io::Result<()> {
        fs::write_json(&self.agent_file(id, agent, "record.json"), record)
    }

    pub fn load_record(&self, id: &SnapshotId, agent: &AgentName) -> Option<AgentRecord> {
        fs::read_json(&self.agent_file(id, agent, "record.json"))
    }

    pub fn save_scrollback(
        &self,
        id: &SnapshotId,
        agent: &AgentName,
        scrollback: &str,
    ) -> std::io::Result<()> {
        fs::write_atomic(
            &self.agent_file(id, agent, "scrollback.txt"),
            scrollback.as_bytes(),
        )
    }

    pub fn load_scrollback(&self, id: &SnapshotId, agent: &AgentName) -> Option<String> {
        std::fs::read_to_string(self.agent_file(id, agent, "scrollback.txt")).ok()
    }

    pub fn save_diff(&self, id: &SnapshotId, agent: &AgentName, diff: &str) -> std::io::Result<()> {
        fs::write_atomic(&self.agent_file(id, agent, "diff.patch"), diff.as_bytes())
    }

    pub fn load_diff(&self, id: &SnapshotId, agent: &AgentName) -> Option<String> {
        std::fs::read_to_string(self.agent_file(id, agent, "diff.patch")).ok()
    }

    fn agent_file(&self, id: &SnapshotId, agent: &AgentName, file: &str) -> std::path::PathBuf {
        self.root.snapshot_agent_dir(id, agent).join(file)
    }
}

#[cfg(test)]
#[path = "snapshots_tests.rs"]
mod tests;
