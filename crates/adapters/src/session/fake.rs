// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing

use super::{SessionAdapter, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded session call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    Spawn {
        name: String,
        cwd: PathBuf,
        cmd: String,
        env: Vec<(String, String)>,
    },
    SendKeys { id: String, keys: String },
    SendLiteral { id: String, text: String },
    SendEnter { id: String },
    Kill { id: String },
    Exists { id: String },
    Capture { id: String, lines: u32 },
    PanePid { id: String },
    Pause { id: String },
    Resume { id: String },
    IsStopped { id: String },
    Attach { id: String },
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub name: String,
    pub cwd: PathBuf,
    pub cmd: String,
    pub env: Vec<(String, String)>,
    /// Canned scrollback served by `capture`
    pub scrollback: String,
    /// Literal text and key sequences sent, in order
    pub sent: Vec<String>,
    pub alive: bool,
    pub stopped: bool,
    pub pane_pid: Option<u32>,
}

#[derive(Default)]
struct FakeSessionState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<SessionCall>,
}

/// Fake session adapter for testing.
///
/// Spawned sessions are held in memory; tests program scrollback, pane PIDs,
/// and liveness, and assert on the recorded call log.
#[derive(Clone, Default)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a session by ID
    pub fn get_session(&self, id: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Program the scrollback served by `capture`
    pub fn set_scrollback(&self, id: &str, scrollback: impl Into<String>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.scrollback = scrollback.into();
        }
    }

    /// Program the pane PID
    pub fn set_pane_pid(&self, id: &str, pid: u32) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.pane_pid = Some(pid);
        }
    }

    /// Mark a session as gone without going through `kill`
    pub fn set_dead(&self, id: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.alive = false;
        }
    }

    /// Text and key sequences sent to a session, in order
    pub fn sent(&self, id: &str) -> Vec<String> {
        self.inner
            .lock()
            .sessions
            .get(id)
            .map(|s| s.sent.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: SessionCall) {
        self.inner.lock().calls.push(call);
    }

    fn with_live_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut FakeSession) -> T,
    ) -> Result<T, SessionError> {
        let mut state = self.inner.lock();
        match state.sessions.get_mut(id) {
            Some(session) if session.alive => Ok(f(session)),
            _ => Err(SessionError::Gone(id.to_string())),
        }
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, SessionError> {
        self.record(SessionCall::Spawn {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
            env: env.to_vec(),
        });
        let mut state = self.inner.lock();
        let pane_pid = Some(40_000 + state.sessions.len() as u32);
        state.sessions.insert(
            name.to_string(),
            FakeSession {
                name: name.to_string(),
                cwd: cwd.to_path_buf(),
                cmd: cmd.to_string(),
                env: env.to_vec(),
                scrollback: String::new(),
                sent: Vec::new(),
                alive: true,
                stopped: false,
                pane_pid,
            },
        );
        Ok(name.to_string())
    }

    async fn send_keys(&self, id: &str, keys: &str) -> Result<(), SessionError> {
        self.record(SessionCall::SendKeys {
            id: id.to_string(),
            keys: keys.to_string(),
        });
        self.with_live_session(id, |s| s.sent.push(format!("<{keys}>")))
    }

    async fn send_literal(&self, id: &str, text: &str) -> Result<(), SessionError> {
        self.record(SessionCall::SendLiteral {
            id: id.to_string(),
            text: text.to_string(),
        });
        self.with_live_session(id, |s| s.sent.push(text.to_string()))
    }

    async fn send_enter(&self, id: &str) -> Result<(), SessionError> {
        self.record(SessionCall::SendEnter { id: id.to_string() });
        self.with_live_session(id, |s| s.sent.push("<Enter>".to_string()))
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        self.record(SessionCall::Kill { id: id.to_string() });
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.alive = false;
        }
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, SessionError> {
        self.record(SessionCall::Exists { id: id.to_string() });
        Ok(self
            .inner
            .lock()
            .sessions
            .get(id)
            .map(|s| s.alive)
            .unwrap_or(false))
    }

    async fn capture(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        self.record(SessionCall::Capture {
            id: id.to_string(),
            lines,
        });
        self.with_live_session(id, |s| s.scrollback.clone())
    }

    async fn pane_pid(&self, id: &str) -> Result<Option<u32>, SessionError> {
        self.record(SessionCall::PanePid { id: id.to_string() });
        self.with_live_session(id, |s| s.pane_pid)
    }

    async fn pause(&self, id: &str) -> Result<(), SessionError> {
        self.record(SessionCall::Pause { id: id.to_string() });
        self.with_live_session(id, |s| s.stopped = true)
    }

    async fn resume(&self, id: &str) -> Result<(), SessionError> {
        self.record(SessionCall::Resume { id: id.to_string() });
        self.with_live_session(id, |s| s.stopped = false)
    }

    async fn is_stopped(&self, id: &str) -> Result<bool, SessionError> {
        self.record(SessionCall::IsStopped { id: id.to_string() });
        self.with_live_session(id, |s| s.stopped)
    }

    async fn attach(&self, id: &str) -> Result<(), SessionError> {
        self.record(SessionCall::Attach { id: id.to_string() });
        self.with_live_session(id, |_| ())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
