// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared artifacts.
//!
//! Publishing copies a file into `shared/<name>/content` beside a metadata
//! record and notifies the recipients. Artifact names are globally unique;
//! collisions get a numeric suffix.

use crate::fs;
use crate::messages::{MessageError, MessageStore};
use crate::paths::DataRoot;
use crate::registry::Registry;
use daedalos_core::{AgentName, ArtifactMeta, IdGen, MessageKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from artifact operations
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("file to share does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("artifact io: {0}")]
    Io(#[from] std::io::Error),
}

/// The shared-artifact namespace.
#[derive(Clone)]
pub struct ArtifactStore {
    root: DataRoot,
}

impl ArtifactStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    /// Publish a file, notifying all agents (empty `recipients`) or the
    /// given subset. Returns the unique artifact name.
    #[allow(clippy::too_many_arguments)]
    pub fn publish(
        &self,
        registry: &Registry,
        messages: &MessageStore,
        from: &AgentName,
        file: &Path,
        recipients: &[AgentName],
        requested_name: Option<&str>,
        id_gen: &impl IdGen,
        epoch_ms: u64,
    ) -> Result<String, ArtifactError> {
        if !file.is_file() {
            return Err(ArtifactError::SourceMissing(file.to_path_buf()));
        }
        let name = self.unique_name(requested_name, file);
        std::fs::create_dir_all(self.root.artifact_dir(&name))?;
        std::fs::copy(file, self.root.artifact_content(&name))?;

        let meta = ArtifactMeta {
            name: name.clone(),
            original_path: file.to_path_buf(),
            shared_by: from.clone(),
            shared_at_ms: epoch_ms,
            recipients: recipients.to_vec(),
        };
        fs::write_json(&self.root.artifact_meta(&name), &meta)?;

        let note = format!("{from} shared artifact {name:?}");
        let targets: Vec<AgentName> = if recipients.is_empty() {
            registry
                .all()
                .into_iter()
                .map(|r| r.name)
                .filter(|n| n != from)
                .collect()
        } else {
            recipients.to_vec()
        };
        for target in &targets {
            messages.send(
                registry,
                target,
                from.as_str(),
                MessageKind::SharedArtifact,
                &note,
                id_gen,
                epoch_ms,
            )?;
        }
        Ok(name)
    }

    /// All artifact metas, oldest first.
    pub fn artifacts(&self) -> Vec<ArtifactMeta> {
        let Ok(entries) = std::fs::read_dir(self.root.shared_dir()) else {
            return Vec::new();
        };
        let mut metas: Vec<ArtifactMeta> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path().join("meta.json"))
            .filter_map(|p| fs::read_json(&p))
            .collect();
        metas.sort_by_key(|m| (m.shared_at_ms, m.name.clone()));
        metas
    }

    /// Meta and content path for one artifact.
    pub fn get(&self, name: &str) -> Option<(ArtifactMeta, PathBuf)> {
        let meta: ArtifactMeta = fs::read_json(&self.root.artifact_meta(name))?;
        let content = self.root.artifact_content(name);
        content.is_file().then_some((meta, content))
    }

    /// Pick a free name: the request (or the file stem), then `-2`, `-3`, …
    fn unique_name(&self, requested: Option<&str>, file: &Path) -> String {
        let base = requested
            .map(str::to_string)
            .filter(|s| fs::safe_name(s))
            .unwrap_or_else(|| {
                let stem = file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("artifact");
                if fs::safe_name(stem) {
                    stem.to_string()
                } else {
                    "artifact".to_string()
                }
            });
        if !self.root.artifact_dir(&base).exists() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.root.artifact_dir(&candidate).exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
