// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory locks with stale-holder recovery.
//!
//! The mutex is the atomic creation of `locks/<name>.lock`; the winner then
//! writes `locks/<name>.meta` with its PID. A contender that finds the
//! sentinel held checks the recorded PID: a dead holder is reclaimed in
//! place. Release removes the meta first and the sentinel last, so the
//! sentinel removal is the single commit point other acquirers race on.

use crate::fs;
use crate::paths::DataRoot;
use daedalos_core::{LockInfo, ProcessProbe};
use thiserror::Error;

/// Errors from lock operations
#[derive(Debug, Error)]
pub enum LockError {
    #[error("invalid lock name: {0:?}")]
    InvalidName(String),

    #[error("lock {name:?} is held by {holder:?}, not {caller:?}")]
    NotOwner {
        name: String,
        holder: String,
        caller: String,
    },

    #[error("lock io: {0}")]
    Io(#[from] std::io::Error),
}

/// The lock namespace, parameterized over a process probe for stale checks.
#[derive(Clone)]
pub struct LockStore<P: ProcessProbe> {
    root: DataRoot,
    probe: P,
}

impl<P: ProcessProbe> LockStore<P> {
    pub fn new(root: &DataRoot, probe: P) -> Self {
        Self {
            root: root.clone(),
            probe,
        }
    }

    /// One acquisition attempt. Returns `true` when this caller now holds
    /// the lock (fresh or reclaimed from a dead holder), `false` when a
    /// live holder keeps it. Polling until timeout is the engine's job.
    pub fn try_acquire(
        &self,
        name: &str,
        owner: &str,
        pid: u32,
        epoch_ms: u64,
    ) -> Result<bool, LockError> {
        if !fs::safe_name(name) {
            return Err(LockError::InvalidName(name.to_string()));
        }
        let sentinel = self.root.lock_sentinel(name);
        match std::fs::create_dir(&sentinel) {
            Ok(()) => {
                self.write_meta(name, owner, pid, epoch_ms)?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let Some(info) = self.info(name) else {
                    // Winner hasn't written its meta yet; treat as held.
                    return Ok(false);
                };
                if self.probe.alive(info.holder_pid) {
                    return Ok(false);
                }
                tracing::warn!(
                    lock = name,
                    stale_owner = %info.owner,
                    stale_pid = info.holder_pid,
                    new_owner = owner,
                    "reclaiming lock from dead holder"
                );
                self.write_meta(name, owner, pid, epoch_ms)?;
                Ok(true)
            }
            Err(e) => Err(LockError::Io(e)),
        }
    }

    /// Release the lock. No-op when not held; `NotOwner` when held by
    /// someone else.
    pub fn release(&self, name: &str, owner: &str) -> Result<(), LockError> {
        if !fs::safe_name(name) {
            return Err(LockError::InvalidName(name.to_string()));
        }
        let Some(info) = self.info(name) else {
            // Not held (or a torn acquire); make sure no bare sentinel lingers.
            let _ = std::fs::remove_dir(self.root.lock_sentinel(name));
            return Ok(());
        };
        if info.owner != owner {
            return Err(LockError::NotOwner {
                name: name.to_string(),
                holder: info.owner,
                caller: owner.to_string(),
            });
        }
        std::fs::remove_file(self.root.lock_meta(name))?;
        std::fs::remove_dir(self.root.lock_sentinel(name))?;
        Ok(())
    }

    /// Whether the lock is currently held.
    pub fn check(&self, name: &str) -> bool {
        self.root.lock_sentinel(name).is_dir()
    }

    pub fn info(&self, name: &str) -> Option<LockInfo> {
        fs::read_json(&self.root.lock_meta(name))
    }

    /// All currently held locks, by meta record.
    pub fn list(&self) -> Vec<LockInfo> {
        let Ok(entries) = std::fs::read_dir(self.root.locks_dir()) else {
            return Vec::new();
        };
        let mut locks: Vec<LockInfo> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|x| x == "meta").unwrap_or(false))
            .filter_map(|p| fs::read_json(&p))
            .collect();
        locks.sort_by(|a, b| a.name.cmp(&b.name));
        locks
    }

    fn write_meta(&self, name: &str, owner: &str, pid: u32, epoch_ms: u64) -> Result<(), LockError> {
        let info = LockInfo {
            name: name.to_string(),
            owner: owner.to_string(),
            holder_pid: pid,
            acquired_at_ms: epoch_ms,
        };
        fs::write_json(&self.root.lock_meta(name), &info)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
