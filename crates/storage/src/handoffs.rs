// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context handoffs.
//!
//! Creating a handoff persists the record and drops a `handoff`-kind message
//! into the recipient's queue carrying the id; accepting verifies the
//! addressing and returns the context.

use crate::fs;
use crate::messages::{MessageError, MessageStore};
use crate::paths::DataRoot;
use crate::registry::Registry;
use daedalos_core::{AgentName, Handoff, HandoffId, HandoffStatus, IdGen, MessageKind};
use thiserror::Error;

/// Errors from handoff operations
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("unknown handoff: {0}")]
    UnknownHandoff(String),

    #[error("handoff {id} is addressed to {to}, not {caller}")]
    NotAddressee {
        id: HandoffId,
        to: AgentName,
        caller: AgentName,
    },

    #[error("handoff {0} was already accepted")]
    AlreadyAccepted(HandoffId),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("handoff io: {0}")]
    Io(#[from] std::io::Error),
}

/// The handoff namespace.
#[derive(Clone)]
pub struct HandoffStore {
    root: DataRoot,
}

impl HandoffStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    /// Create a handoff and notify the recipient.
    pub fn create(
        &self,
        registry: &Registry,
        messages: &MessageStore,
        from: &AgentName,
        to: &AgentName,
        context: &str,
        id_gen: &impl IdGen,
        epoch_ms: u64,
    ) -> Result<HandoffId, HandoffError> {
        if registry.lookup(to.as_str()).is_none() {
            return Err(HandoffError::Message(MessageError::UnknownRecipient(
                to.to_string(),
            )));
        }
        let id = HandoffId::new(id_gen.next());
        let handoff = Handoff {
            id: id.clone(),
            from: from.clone(),
            to: to.clone(),
            context: context.to_string(),
            created_at_ms: epoch_ms,
            status: HandoffStatus::Pending,
        };
        fs::write_json(&self.root.handoff_file(&id), &handoff)?;
        let note = format!("Handoff {id} from {from}: accept it to receive the context");
        messages.send(
            registry,
            to,
            from.as_str(),
            MessageKind::Handoff,
            &note,
            id_gen,
            epoch_ms,
        )?;
        Ok(id)
    }

    /// Accept a pending handoff addressed to `agent`, returning its context.
    pub fn accept(&self, id: &HandoffId, agent: &AgentName) -> Result<String, HandoffError> {
        let path = self.root.handoff_file(id);
        let Some(mut handoff) = fs::read_json::<Handoff>(&path) else {
            return Err(HandoffError::UnknownHandoff(id.to_string()));
        };
        if handoff.to != *agent {
            return Err(HandoffError::NotAddressee {
                id: id.clone(),
                to: handoff.to,
                caller: agent.clone(),
            });
        }
        if handoff.status == HandoffStatus::Accepted {
            return Err(HandoffError::AlreadyAccepted(id.clone()));
        }
        handoff.status = HandoffStatus::Accepted;
        fs::write_json(&path, &handoff)?;
        Ok(handoff.context)
    }

    pub fn get(&self, id: &HandoffId) -> Option<Handoff> {
        fs::read_json(&self.root.handoff_file(id))
    }

    /// All handoffs, newest first.
    pub fn list(&self) -> Vec<Handoff> {
        let Ok(entries) = std::fs::read_dir(self.root.handoffs_dir()) else {
            return Vec::new();
        };
        let mut handoffs: Vec<Handoff> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter_map(|p| fs::read_json(&p))
            .collect();
        handoffs.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        handoffs
    }
}

#[cfg(test)]
#[path = "handoffs_tests.rs"]
mod tests;
