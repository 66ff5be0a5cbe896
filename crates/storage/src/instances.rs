// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow instance persistence.

use crate::fs;
use crate::paths::DataRoot;
use daedalos_core::{InstanceId, WorkflowInstance};
use std::path::PathBuf;

/// The workflow-state namespace.
#[derive(Clone)]
pub struct InstanceStore {
    root: DataRoot,
}

impl InstanceStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    pub fn save(&self, instance: &WorkflowInstance) -> std::io::Result<()> {
        fs::write_json(&self.root.instance_file(&instance.id), instance)
    }

    pub fn load(&self, id: &InstanceId) -> Option<WorkflowInstance> {
        fs::read_json(&self.root.instance_file(id))
    }

    /// All instances, newest first.
    pub fn list(&self) -> Vec<WorkflowInstance> {
        let Ok(entries) = std::fs::read_dir(self.root.workflow_state_dir()) else {
            return Vec::new();
        };
        let mut instances: Vec<WorkflowInstance> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().map(|x| x == "json").unwrap_or(false))
            .filter_map(|p| fs::read_json(&p))
            .collect();
        instances.sort_by(|a, b| b.started_at_ms.cmp(&a.started_at_ms));
        instances
    }

    /// The instance's aggregated-output directory, created on demand.
    pub fn output_dir(&self, id: &InstanceId) -> std::io::Result<PathBuf> {
        let dir = self.root.instance_output_dir(id);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
#[path = "instances_tests.rs"]
mod tests;
