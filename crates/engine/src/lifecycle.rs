// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent lifecycle: spawn, kill, pause, resume, focus, peek, status.

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::hooks::{self, HookContext, HookEvent};
use crate::status::{self, SessionState, DEFAULT_TAIL_LINES};
use daedalos_adapters::{SessionAdapter, SessionError};
use daedalos_core::{AgentName, AgentRecord, AgentStatus, Clock, IdGen, ProcessProbe};
use daedalos_storage::Registry;
use std::path::Path;

/// Options for spawning an agent.
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub template: String,
    /// Explicit slot; `None` takes the lowest free one
    pub slot: Option<u32>,
    /// Initial user prompt, sent after the session settles
    pub prompt: Option<String>,
    /// Extra environment on top of the template's
    pub env: Vec<(String, String)>,
    /// Attach after spawn when already inside an interactive session
    pub focus: bool,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            template: "default".to_string(),
            slot: None,
            prompt: None,
            env: Vec::new(),
            focus: false,
        }
    }
}

impl<S: SessionAdapter, C: Clock, P: ProcessProbe, G: IdGen> Engine<S, C, P, G> {
    /// Spawn a new agent.
    ///
    /// A registry entry whose session has died is reclaimed; a live homonym
    /// is a `DuplicateName`.
    pub async fn spawn(
        &self,
        name: &str,
        project: &Path,
        opts: SpawnOptions,
    ) -> Result<AgentRecord> {
        let agent = AgentName::parse(name).map_err(daedalos_storage::RegistryError::from)?;
        let mut registry = self.registry()?;

        if let Some(existing) = registry.lookup(agent.as_str()) {
            if self.sessions.exists(&existing.session).await.unwrap_or(false) {
                return Err(daedalos_storage::RegistryError::DuplicateName(agent).into());
            }
            tracing::warn!(agent = %agent, "reclaiming registry entry whose session is gone");
            registry.delete(agent.as_str())?;
        }

        if !project.is_dir() {
            tracing::warn!(agent = %agent, project = %project.display(), "project directory does not exist");
        }

        let playbook = self.playbook()?;
        let template = playbook.template(&opts.template)?;

        // Allocates the slot and checks the cap before any session exists
        let record = registry.create(
            agent.as_str(),
            project.to_path_buf(),
            opts.template.clone(),
            opts.slot,
            self.clock.epoch_ms(),
        )?;

        let mut env = self.agent_env(&record);
        env.extend(template.env_vec());
        env.extend(opts.env.iter().cloned());

        let command = template.build_command();
        let session = match self
            .sessions
            .spawn(&record.session, project, &command, &env)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                // Roll the registry entry back so the slot frees up
                registry.delete(agent.as_str())?;
                return Err(e.into());
            }
        };
        if session != record.session {
            registry.set_session(agent.as_str(), session.clone())?;
        }
        tracing::info!(agent = %agent, session = %session, slot = record.slot, "agent spawned");

        // Give the agent a moment to start before reading its PID
        if !self.opts.settle.is_zero() {
            tokio::time::sleep(self.opts.settle).await;
        }
        if let Ok(Some(pid)) = self.sessions.pane_pid(&session).await {
            registry.set_child_pid(agent.as_str(), pid)?;
        }

        let project_str = project.display().to_string();
        hooks::run_hooks(
            &self.root,
            HookContext {
                event: HookEvent::OnSpawn,
                agent: agent.as_str(),
                data: "",
                project: Some(project_str.as_str()),
                template: Some(opts.template.as_str()),
                status: Some(AgentStatus::Starting.as_str()),
            },
        )
        .await;

        if let Some(ref task) = opts.prompt {
            let prompt = template.effective_prompt(task);
            self.send_prompt(&session, &prompt).await?;
        }

        if opts.focus && inside_session() {
            if let Err(e) = self.sessions.attach(&session).await {
                tracing::warn!(agent = %agent, error = %e, "focus after spawn failed");
            }
        }

        registry.reload();
        registry
            .lookup(agent.as_str())
            .cloned()
            .ok_or_else(|| EngineError::UnknownAgent(agent.to_string()))
    }

    /// Drive a prompt into a session: clear any half-typed input, type the
    /// text, give the TUI time to ingest it, then submit.
    pub async fn send_prompt(&self, session: &str, text: &str) -> Result<()> {
        let pause = self.opts.key_pause;
        self.sessions.send_keys(session, "Escape").await?;
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        self.sessions.send_keys(session, "Escape").await?;
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        self.sessions.send_literal(session, text).await?;
        if !pause.is_zero() {
            // The TUI re-renders per keystroke; longer text needs longer
            let settle = pause + std::time::Duration::from_millis((text.len() as u64).min(2000));
            tokio::time::sleep(settle).await;
        }
        self.sessions.send_enter(session).await?;
        Ok(())
    }

    /// Kill an agent: graceful interrupt first unless `force`, then the
    /// session dies either way. The registry entry is removed last.
    pub async fn kill(&self, identifier: &str, force: bool) -> Result<()> {
        let mut registry = self.registry()?;
        let agent = self.resolve(&registry, identifier)?;
        let record = registry
            .lookup(agent.as_str())
            .cloned()
            .ok_or_else(|| EngineError::UnknownAgent(identifier.to_string()))?;

        if !force {
            // Best effort: let the agent interrupt whatever it's doing
            let _ = self.sessions.send_keys(&record.session, "C-c").await;
            if !self.opts.kill_grace.is_zero() {
                tokio::time::sleep(self.opts.kill_grace).await;
            }
        }
        self.sessions.kill(&record.session).await?;

        let project_str = record.project.display().to_string();
        hooks::run_hooks(
            &self.root,
            HookContext {
                event: HookEvent::OnKill,
                agent: agent.as_str(),
                data: if force { "forced" } else { "graceful" },
                project: Some(project_str.as_str()),
                template: Some(record.template.as_str()),
                status: Some(record.status.as_str()),
            },
        )
        .await;

        registry.delete(agent.as_str())?;
        tracing::info!(agent = %agent, force, "agent killed");
        Ok(())
    }

    /// Stop the agent's child process; status caches as `Paused`.
    pub async fn pause(&self, identifier: &str) -> Result<()> {
        let mut registry = self.registry()?;
        let agent = self.resolve(&registry, identifier)?;
        let session = self.session_of(&registry, &agent)?;
        self.sessions.pause(&session).await?;
        registry.set_status(agent.as_str(), AgentStatus::Paused)?;
        Ok(())
    }

    /// Continue the agent's child process; status reverts to detection.
    pub async fn resume(&self, identifier: &str) -> Result<()> {
        let mut registry = self.registry()?;
        let agent = self.resolve(&registry, identifier)?;
        let session = self.session_of(&registry, &agent)?;
        self.sessions.resume(&session).await?;
        registry.set_status(agent.as_str(), AgentStatus::Active)?;
        Ok(())
    }

    /// Attach to (or switch to) the agent's session.
    pub async fn focus(&self, identifier: &str) -> Result<()> {
        let registry = self.registry()?;
        let agent = self.resolve(&registry, identifier)?;
        let session = self.session_of(&registry, &agent)?;
        self.sessions.attach(&session).await?;
        Ok(())
    }

    /// Capture the tail of the agent's scrollback without attaching.
    pub async fn peek(&self, identifier: &str, lines: u32) -> Result<String> {
        let registry = self.registry()?;
        let agent = self.resolve(&registry, identifier)?;
        let session = self.session_of(&registry, &agent)?;
        Ok(self.sessions.capture(&session, lines).await?)
    }

    /// One agent's record with a freshly detected status (cache refreshed).
    pub async fn agent_status(&self, identifier: &str) -> Result<AgentRecord> {
        let mut registry = self.registry()?;
        let agent = self.resolve(&registry, identifier)?;
        let status = {
            let record = registry
                .lookup(agent.as_str())
                .ok_or_else(|| EngineError::UnknownAgent(identifier.to_string()))?;
            self.detect_status(record).await
        };
        registry.set_status(agent.as_str(), status)?;
        registry
            .lookup(agent.as_str())
            .cloned()
            .ok_or_else(|| EngineError::UnknownAgent(identifier.to_string()))
    }

    /// Every record with freshly detected statuses.
    pub async fn list_agents(&self) -> Result<Vec<AgentRecord>> {
        let mut registry = self.registry()?;
        let records = registry.all();
        let mut refreshed = Vec::with_capacity(records.len());
        for record in records {
            let status = self.detect_status(&record).await;
            registry.set_status(record.name.as_str(), status)?;
            let mut record = record;
            record.status = status;
            refreshed.push(record);
        }
        Ok(refreshed)
    }

    /// Classify one agent from a fresh scrollback capture.
    pub(crate) async fn detect_status(&self, record: &AgentRecord) -> AgentStatus {
        let session = &record.session;
        let exists = self.sessions.exists(session).await.unwrap_or(false);
        if !exists {
            return AgentStatus::Dead;
        }
        let stopped = self.sessions.is_stopped(session).await.unwrap_or(false);
        let scrollback = match self.sessions.capture(session, DEFAULT_TAIL_LINES as u32).await {
            Ok(scrollback) => scrollback,
            Err(SessionError::Gone(_)) => return AgentStatus::Dead,
            Err(_) => String::new(),
        };
        status::detect(&scrollback, SessionState { exists, stopped })
    }

    /// The environment injected into every agent session.
    fn agent_env(&self, record: &AgentRecord) -> Vec<(String, String)> {
        let root = self.root.path().display().to_string();
        vec![
            ("AGENT_NAME".into(), record.name.to_string()),
            ("AGENT_SESSION".into(), record.session.clone()),
            ("AGENT_SLOT".into(), record.slot.to_string()),
            ("DATA_ROOT".into(), root),
            (
                "MESSAGES_DIR".into(),
                self.root.messages_dir().display().to_string(),
            ),
            (
                "SIGNALS_DIR".into(),
                self.root.signals_dir().display().to_string(),
            ),
            (
                "SHARED_DIR".into(),
                self.root.shared_dir().display().to_string(),
            ),
        ]
    }

    fn session_of(&self, registry: &Registry, agent: &AgentName) -> Result<String> {
        registry
            .lookup(agent.as_str())
            .map(|r| r.session.clone())
            .ok_or_else(|| EngineError::UnknownAgent(agent.to_string()))
    }
}

/// Whether this process already runs inside an interactive session.
fn inside_session() -> bool {
    std::env::var_os("TMUX").is_some()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
