// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data root layout.
//!
//! Single source of truth for where every namespace lives. Other modules
//! never build paths themselves.

use daedalos_core::{AgentName, HandoffId, InstanceId, SnapshotId};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data root location.
pub const DATA_ROOT_ENV: &str = "DAEDALOS_DATA_ROOT";

/// The root directory all inter-process state lives under.
#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data root from `DAEDALOS_DATA_ROOT`, else the platform
    /// data dir, else `.daedalos` in the current directory.
    pub fn discover() -> Self {
        if let Some(root) = std::env::var_os(DATA_ROOT_ENV) {
            return Self::new(PathBuf::from(root));
        }
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from(".daedalos"));
        Self::new(base.join("daedalos"))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create every namespace directory. Idempotent.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        for dir in [
            self.root.clone(),
            self.messages_dir(),
            self.signals_dir(),
            self.locks_dir(),
            self.claims_dir(),
            self.claims_archive_dir(),
            self.shared_dir(),
            self.handoffs_dir(),
            self.snapshots_dir(),
            self.workflow_state_dir(),
            self.hooks_dir(),
            self.templates_dir(),
            self.workflows_dir(),
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    // -- registry --

    pub fn agents_file(&self) -> PathBuf {
        self.root.join("agents.json")
    }

    // -- messages --

    pub fn messages_dir(&self) -> PathBuf {
        self.root.join("messages")
    }

    pub fn message_queue(&self, agent: &AgentName) -> PathBuf {
        self.messages_dir().join(format!("{agent}.jsonl"))
    }

    // -- signals --

    pub fn signals_dir(&self) -> PathBuf {
        self.root.join("signals")
    }

    pub fn signal_file(&self, agent: &AgentName) -> PathBuf {
        self.signals_dir().join(agent.as_str()).join("completion.json")
    }

    // -- locks --

    pub fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    pub fn lock_sentinel(&self, name: &str) -> PathBuf {
        self.locks_dir().join(format!("{name}.lock"))
    }

    pub fn lock_meta(&self, name: &str) -> PathBuf {
        self.locks_dir().join(format!("{name}.meta"))
    }

    // -- claims --

    pub fn claims_dir(&self) -> PathBuf {
        self.root.join("claims")
    }

    pub fn claims_archive_dir(&self) -> PathBuf {
        self.claims_dir().join("archive")
    }

    pub fn claim_file(&self, task_id: &str) -> PathBuf {
        self.claims_dir().join(format!("{task_id}.json"))
    }

    pub fn archived_claim_file(&self, task_id: &str) -> PathBuf {
        self.claims_archive_dir().join(format!("{task_id}.json"))
    }

    // -- shared artifacts --

    pub fn shared_dir(&self) -> PathBuf {
        self.root.join("shared")
    }

    pub fn artifact_dir(&self, name: &str) -> PathBuf {
        self.shared_dir().join(name)
    }

    pub fn artifact_content(&self, name: &str) -> PathBuf {
        self.artifact_dir(name).join("content")
    }

    pub fn artifact_meta(&self, name: &str) -> PathBuf {
        self.artifact_dir(name).join("meta.json")
    }

    // -- handoffs --

    pub fn handoffs_dir(&self) -> PathBuf {
        self.root.join("handoffs")
    }

    pub fn handoff_file(&self, id: &HandoffId) -> PathBuf {
        self.handoffs_dir().join(format!("{id}.json"))
    }

    // -- snapshots --

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    pub fn snapshot_dir(&self, id: &SnapshotId) -> PathBuf {
        self.snapshots_dir().join(id.as_str())
    }

    pub fn snapshot_meta(&self, id: &SnapshotId) -> PathBuf {
        self.snapshot_dir(id).join("meta.json")
    }

    pub fn snapshot_agent_dir(&self, id: &SnapshotId, agent: &AgentName) -> PathBuf {
        self.snapshot_dir(id).join(agent.as_str())
    }

    // -- workflow state --

    pub fn workflow_state_dir(&self) -> PathBuf {
        self.root.join("workflow_state")
    }

    pub fn instance_file(&self, id: &InstanceId) -> PathBuf {
        self.workflow_state_dir().join(format!("{id}.json"))
    }

    pub fn instance_output_dir(&self, id: &InstanceId) -> PathBuf {
        self.workflow_state_dir().join(format!("{id}-output"))
    }

    // -- hooks --

    pub fn hooks_dir(&self) -> PathBuf {
        self.root.join("hooks")
    }

    pub fn hook_event_dir(&self, event: &str) -> PathBuf {
        self.hooks_dir().join(event)
    }

    // -- playbook documents --

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join("workflows")
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
