// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion signal records.
//!
//! One record per agent under `signals/<agent>/completion.json`. Writing is
//! an overwrite: a retry replaces the previous attempt, and `check` always
//! observes the latest write.

use crate::fs;
use crate::paths::DataRoot;
use daedalos_core::{AgentName, CompletionSignal, SignalStatus};

/// The completion-signal namespace.
#[derive(Clone)]
pub struct SignalStore {
    root: DataRoot,
}

impl SignalStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    /// Write (or overwrite) the agent's completion signal.
    pub fn complete(
        &self,
        agent: &AgentName,
        status: SignalStatus,
        data: Option<String>,
        epoch_ms: u64,
    ) -> std::io::Result<CompletionSignal> {
        let signal = CompletionSignal {
            agent: agent.clone(),
            status,
            data,
            signaled_at_ms: epoch_ms,
        };
        fs::write_json(&self.root.signal_file(agent), &signal)?;
        Ok(signal)
    }

    /// Whether a signal currently exists for the agent.
    pub fn check(&self, agent: &AgentName) -> bool {
        self.get(agent).is_some()
    }

    pub fn get(&self, agent: &AgentName) -> Option<CompletionSignal> {
        fs::read_json(&self.root.signal_file(agent))
    }

    /// Remove the signal. Clearing an absent signal is fine.
    pub fn clear(&self, agent: &AgentName) -> std::io::Result<()> {
        match std::fs::remove_file(self.root.signal_file(agent)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
