// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking synchronization: signal waits and lock acquisition.
//!
//! All waits poll the filesystem at a configurable interval; they block the
//! calling process only, never the watched agent. Timeouts are ordinary
//! outcomes (`false`), not errors, so callers choose the next action.

use crate::engine::Engine;
use crate::error::Result;
use crate::hooks::{self, HookContext, HookEvent};
use daedalos_adapters::SessionAdapter;
use daedalos_core::{
    AgentName, Clock, CompletionSignal, IdGen, ProcessProbe, SignalStatus,
};
use std::time::Duration;

/// Default interval between filesystem polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

impl<S: SessionAdapter, C: Clock, P: ProcessProbe, G: IdGen> Engine<S, C, P, G> {
    /// Write a completion signal and fire `on_complete` hooks.
    pub async fn complete(
        &self,
        agent: &AgentName,
        status: SignalStatus,
        data: Option<String>,
    ) -> Result<CompletionSignal> {
        let signal = self
            .signals()
            .complete(agent, status, data.clone(), self.clock.epoch_ms())?;
        // Signaling is activity; refresh the timestamp when the agent is
        // registered (workflow helpers may signal under unregistered names)
        let mut registry = self.registry()?;
        if registry.lookup(agent.as_str()).is_some() {
            registry.touch(agent.as_str(), self.clock.epoch_ms())?;
        }
        hooks::run_hooks(
            &self.root,
            HookContext {
                event: HookEvent::OnComplete,
                agent: agent.as_str(),
                data: data.as_deref().unwrap_or(status.as_str()),
                project: None,
                template: None,
                status: Some(status.as_str()),
            },
        )
        .await;
        Ok(signal)
    }

    /// Poll for a completion signal. `true` iff one exists before timeout.
    pub async fn wait_signal(
        &self,
        agent: &AgentName,
        timeout: Duration,
        poll: Duration,
    ) -> bool {
        let signals = self.signals();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if signals.check(agent) {
                return true;
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return false;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }

    /// Poll until every agent has signaled. `true` iff all did in time.
    pub async fn wait_all(
        &self,
        agents: &[AgentName],
        timeout: Duration,
        poll: Duration,
    ) -> bool {
        let signals = self.signals();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if agents.iter().all(|a| signals.check(a)) {
                return true;
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return false;
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }

    /// Acquire an advisory lock, polling until success or timeout.
    ///
    /// A zero timeout makes exactly one attempt. Returns `true` when the
    /// lock is held by `owner` on return.
    pub async fn acquire_lock(
        &self,
        name: &str,
        owner: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<bool> {
        let locks = self.locks();
        let pid = std::process::id();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if locks.try_acquire(name, owner, pid, self.clock.epoch_ms())? {
                return Ok(true);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
