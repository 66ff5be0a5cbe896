// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent registry: authoritative directory of agents.
//!
//! One `agents.json` document maps name to record, kept in insertion order
//! so ambiguous resolution is deterministic. Every mutation persists
//! atomically before returning; cooperating processes re-open or `reload`
//! to observe each other's writes.

use crate::fs;
use crate::paths::DataRoot;
use daedalos_core::{AgentName, AgentRecord, AgentStatus, NameError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error("duplicate agent name: {0}")]
    DuplicateName(AgentName),

    #[error("no free slot: all {0} slots are in use")]
    NoSlot(u32),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("registry io: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk shape of the registry document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryDoc {
    #[serde(default)]
    agents: IndexMap<String, AgentRecord>,
}

/// The agent directory, backed by `agents.json`.
pub struct Registry {
    path: PathBuf,
    max_slots: u32,
    agents: IndexMap<String, AgentRecord>,
}

impl Registry {
    /// Open the registry at the data root, loading any existing document.
    /// A torn document is treated as empty (and logged).
    pub fn open(root: &DataRoot, max_slots: u32) -> Result<Self, RegistryError> {
        let path = root.agents_file();
        let doc: RegistryDoc = fs::read_json(&path).unwrap_or_default();
        Ok(Self {
            path,
            max_slots,
            agents: doc.agents,
        })
    }

    pub fn max_slots(&self) -> u32 {
        self.max_slots
    }

    /// Re-read the document to pick up writes from other processes.
    pub fn reload(&mut self) {
        let doc: RegistryDoc = fs::read_json(&self.path).unwrap_or_default();
        self.agents = doc.agents;
    }

    /// Create a record. Fails before any mutation on invalid names,
    /// duplicates, or slot exhaustion.
    pub fn create(
        &mut self,
        name: &str,
        project: PathBuf,
        template: String,
        slot: Option<u32>,
        epoch_ms: u64,
    ) -> Result<AgentRecord, RegistryError> {
        let name = AgentName::parse(name)?;
        if self.agents.contains_key(name.as_str()) {
            return Err(RegistryError::DuplicateName(name));
        }
        let slot = match slot {
            Some(slot) => {
                if slot == 0 || slot > self.max_slots || self.slot_taken(slot) {
                    return Err(RegistryError::NoSlot(self.max_slots));
                }
                slot
            }
            None => self.next_slot().ok_or(RegistryError::NoSlot(self.max_slots))?,
        };
        let record = AgentRecord::new(name.clone(), slot, project, template, epoch_ms);
        self.agents.insert(name.as_str().to_string(), record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Delete a record. Idempotent.
    pub fn delete(&mut self, name: &str) -> Result<(), RegistryError> {
        // shift_remove keeps insertion order for the survivors
        if self.agents.shift_remove(name).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// Update the activity timestamp.
    pub fn touch(&mut self, name: &str, epoch_ms: u64) -> Result<(), RegistryError> {
        let record = self.get_mut(name)?;
        record.touch(epoch_ms);
        self.persist()
    }

    pub fn set_status(&mut self, name: &str, status: AgentStatus) -> Result<(), RegistryError> {
        let record = self.get_mut(name)?;
        record.status = status;
        self.persist()
    }

    pub fn set_child_pid(&mut self, name: &str, pid: u32) -> Result<(), RegistryError> {
        let record = self.get_mut(name)?;
        record.child_pid = pid;
        self.persist()
    }

    pub fn set_session(&mut self, name: &str, session: String) -> Result<(), RegistryError> {
        let record = self.get_mut(name)?;
        record.session = session;
        self.persist()
    }

    pub fn lookup(&self, name: &str) -> Option<&AgentRecord> {
        self.agents.get(name)
    }

    /// Resolve a user-supplied identifier to an agent name.
    ///
    /// Numeric identifiers resolve as slots; otherwise exact name, then
    /// prefix, then substring. Ambiguity resolves to the first match in
    /// insertion order.
    pub fn resolve(&self, identifier: &str) -> Option<AgentName> {
        if let Ok(slot) = identifier.parse::<u32>() {
            return self
                .agents
                .values()
                .find(|r| r.slot == slot)
                .map(|r| r.name.clone());
        }
        if let Some(record) = self.agents.get(identifier) {
            return Some(record.name.clone());
        }
        if let Some(record) = self
            .agents
            .values()
            .find(|r| r.name.as_str().starts_with(identifier))
        {
            return Some(record.name.clone());
        }
        self.agents
            .values()
            .find(|r| r.name.as_str().contains(identifier))
            .map(|r| r.name.clone())
    }

    /// Lowest free slot in `1..=max_slots`.
    pub fn next_slot(&self) -> Option<u32> {
        (1..=self.max_slots).find(|slot| !self.slot_taken(*slot))
    }

    pub fn all(&self) -> Vec<AgentRecord> {
        self.agents.values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn slot_taken(&self, slot: u32) -> bool {
        self.agents.values().any(|r| r.slot == slot)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut AgentRecord, RegistryError> {
        self.agents
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownAgent(name.to_string()))
    }

    fn persist(&self) -> Result<(), RegistryError> {
        let doc = RegistryDoc {
            agents: self.agents.clone(),
        };
        fs::write_json(&self.path, &doc)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
