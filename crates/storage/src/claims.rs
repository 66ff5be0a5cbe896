// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task claims.
//!
//! A claim is one small file under `claims/<task_id>.json`. Releasing moves
//! the record to `claims/archive/` so history survives without cluttering
//! the active namespace.

use crate::fs;
use crate::paths::DataRoot;
use daedalos_core::{AgentName, Claim, ClaimStatus};
use thiserror::Error;

/// Errors from claim operations
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("invalid task id: {0:?}")]
    InvalidTaskId(String),

    #[error("task {task_id:?} already claimed by {owner}")]
    AlreadyClaimed { task_id: String, owner: AgentName },

    #[error("no active claim for task {0:?}")]
    UnknownClaim(String),

    #[error("claim io: {0}")]
    Io(#[from] std::io::Error),
}

/// The claim namespace.
#[derive(Clone)]
pub struct ClaimStore {
    root: DataRoot,
}

impl ClaimStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    /// Claim a task. Idempotent for the same owner; a different owner gets
    /// `AlreadyClaimed`.
    pub fn create(
        &self,
        task_id: &str,
        agent: &AgentName,
        description: &str,
        epoch_ms: u64,
    ) -> Result<Claim, ClaimError> {
        if !fs::safe_name(task_id) {
            return Err(ClaimError::InvalidTaskId(task_id.to_string()));
        }
        if let Some(existing) = self.get(task_id) {
            if existing.agent == *agent {
                return Ok(existing);
            }
            return Err(ClaimError::AlreadyClaimed {
                task_id: task_id.to_string(),
                owner: existing.agent,
            });
        }
        let claim = Claim::new(
            task_id.to_string(),
            agent.clone(),
            description.to_string(),
            epoch_ms,
        );
        fs::write_json(&self.root.claim_file(task_id), &claim)?;
        Ok(claim)
    }

    /// Release a claim with a final status, archiving the record.
    pub fn release(
        &self,
        task_id: &str,
        agent: &AgentName,
        status: ClaimStatus,
        epoch_ms: u64,
    ) -> Result<Claim, ClaimError> {
        if !fs::safe_name(task_id) {
            return Err(ClaimError::InvalidTaskId(task_id.to_string()));
        }
        let Some(mut claim) = self.get(task_id) else {
            return Err(ClaimError::UnknownClaim(task_id.to_string()));
        };
        if claim.agent != *agent {
            return Err(ClaimError::AlreadyClaimed {
                task_id: task_id.to_string(),
                owner: claim.agent,
            });
        }
        claim.status = status;
        claim.released_at_ms = Some(epoch_ms);
        fs::write_json(&self.root.archived_claim_file(task_id), &claim)?;
        std::fs::remove_file(self.root.claim_file(task_id))?;
        Ok(claim)
    }

    /// Whether the task has an active claim.
    pub fn check(&self, task_id: &str) -> bool {
        self.get(task_id).is_some()
    }

    pub fn get(&self, task_id: &str) -> Option<Claim> {
        fs::read_json(&self.root.claim_file(task_id))
    }

    /// Active claims, sorted by task id.
    pub fn list(&self) -> Vec<Claim> {
        let Ok(entries) = std::fs::read_dir(self.root.claims_dir()) else {
            return Vec::new();
        };
        let mut claims: Vec<Claim> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().map(|x| x == "json").unwrap_or(false))
            .filter_map(|p| fs::read_json(&p))
            .collect();
        claims.sort_by(|a, b| a.task_id.cmp(&b.task_id));
        claims
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
