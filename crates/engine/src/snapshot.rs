// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot and restore.
//!
//! A snapshot captures, per covered agent, its registry record, the current
//! scrollback, and (for git projects) a diff of uncommitted working-tree
//! changes. Restore re-spawns missing agents from their records and
//! re-applies the captured diff.

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::lifecycle::SpawnOptions;
use daedalos_adapters::SessionAdapter;
use daedalos_core::{AgentName, Clock, IdGen, ProcessProbe, SnapshotId, SnapshotMeta};
use std::path::Path;
use tokio::process::Command;

/// Which agents a snapshot covers.
#[derive(Debug, Clone)]
pub enum SnapshotTarget {
    All,
    One(String),
}

impl<S: SessionAdapter, C: Clock, P: ProcessProbe, G: IdGen> Engine<S, C, P, G> {
    /// Capture a snapshot of one agent or all of them.
    pub async fn snapshot(
        &self,
        target: SnapshotTarget,
        label: Option<String>,
    ) -> Result<SnapshotId> {
        let registry = self.registry()?;
        let records = match target {
            SnapshotTarget::All => registry.all(),
            SnapshotTarget::One(ref identifier) => {
                let agent = self.resolve(&registry, identifier)?;
                vec![registry
                    .lookup(agent.as_str())
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownAgent(identifier.clone()))?]
            }
        };

        let id = SnapshotId::new(format!("snap-{}", self.id_gen.next()));
        let snapshots = self.snapshots();
        let mut covered = Vec::new();

        for record in &records {
            snapshots.save_record(&id, &record.name, record)?;
            match self.sessions.capture(&record.session, 2000).await {
                Ok(scrollback) => snapshots.save_scrollback(&id, &record.name, &scrollback)?,
                Err(e) => {
                    tracing::warn!(agent = %record.name, error = %e, "scrollback capture failed, storing empty");
                    snapshots.save_scrollback(&id, &record.name, "")?;
                }
            }
            if let Some(diff) = working_tree_diff(&record.project).await {
                snapshots.save_diff(&id, &record.name, &diff)?;
            }
            covered.push(record.name.clone());
        }

        let meta = SnapshotMeta {
            id: id.clone(),
            label,
            created_at_ms: self.clock.epoch_ms(),
            agents: covered,
        };
        snapshots.save_meta(&meta)?;
        tracing::info!(snapshot = %id, agents = meta.agents.len(), "snapshot taken");
        Ok(id)
    }

    /// Restore agents from a snapshot.
    ///
    /// Live homonyms are warned about and skipped. Returns the agents that
    /// were actually re-spawned.
    pub async fn restore(
        &self,
        snapshot_id: &str,
        which: Option<&str>,
        focus: bool,
    ) -> Result<Vec<AgentName>> {
        let id = SnapshotId::new(snapshot_id);
        let snapshots = self.snapshots();
        let meta = snapshots
            .load_meta(&id)
            .ok_or_else(|| EngineError::UnknownSnapshot(snapshot_id.to_string()))?;

        let mut restored = Vec::new();
        for agent in &meta.agents {
            if let Some(filter) = which {
                if agent.as_str() != filter {
                    continue;
                }
            }
            let Some(record) = snapshots.load_record(&id, agent) else {
                tracing::warn!(snapshot = %id, agent = %agent, "snapshot has no record for agent");
                continue;
            };

            let registry = self.registry()?;
            if let Some(existing) = registry.lookup(agent.as_str()) {
                if self.sessions.exists(&existing.session).await.unwrap_or(false) {
                    tracing::warn!(agent = %agent, "live agent with this name exists, skipping restore");
                    continue;
                }
            }
            drop(registry);

            self.spawn(
                agent.as_str(),
                &record.project,
                SpawnOptions {
                    template: record.template.clone(),
                    ..SpawnOptions::default()
                },
            )
            .await?;

            if let Some(diff) = snapshots.load_diff(&id, agent) {
                if let Err(e) = apply_diff(&record.project, &diff).await {
                    tracing::warn!(agent = %agent, error = %e, "failed to re-apply working-tree diff");
                }
            }
            restored.push(agent.clone());
        }

        if focus {
            if let Some(first) = restored.first() {
                let registry = self.registry()?;
                if let Some(record) = registry.lookup(first.as_str()) {
                    if let Err(e) = self.sessions.attach(&record.session).await {
                        tracing::warn!(agent = %first, error = %e, "focus after restore failed");
                    }
                }
            }
        }
        Ok(restored)
    }
}

/// Diff of uncommitted changes, when the project is under git.
async fn working_tree_diff(project: &Path) -> Option<String> {
    let inside = Command::new("git")
        .args(["-C"])
        .arg(project)
        .args(["rev-parse", "--is-inside-work-tree"])
        .output()
        .await
        .ok()?;
    if !inside.status.success() {
        return None;
    }
    let output = Command::new("git")
        .args(["-C"])
        .arg(project)
        .args(["diff", "HEAD"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let diff = String::from_utf8_lossy(&output.stdout).to_string();
    (!diff.trim().is_empty()).then_some(diff)
}

/// Apply a captured diff back onto the project working tree.
async fn apply_diff(project: &Path, diff: &str) -> std::io::Result<()> {
    let patch = project.join(".daedalos-restore.patch");
    tokio::fs::write(&patch, diff).await?;
    let output = Command::new("git")
        .args(["-C"])
        .arg(project)
        .args(["apply"])
        .arg(&patch)
        .output()
        .await?;
    let _ = tokio::fs::remove_file(&patch).await;
    if !output.status.success() {
        return Err(std::io::Error::other(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
