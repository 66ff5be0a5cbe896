// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session management adapters

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session no longer exists; callers treat the agent as dead.
    #[error("session gone: {0}")]
    Gone(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for attachable interactive sessions hosting agent processes.
///
/// Callers pass the full session name (the lifecycle derives `agent-<name>`
/// deterministically); adapters never invent identifiers. All operations are
/// idempotent where the backend allows, and scrollback capture is bounded.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Spawn a new detached session rooted at `cwd`, running `cmd` with the
    /// given extra environment. Returns the session handle.
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, SessionError>;

    /// Send a key sequence (key names interpreted, e.g. `Escape`, `C-c`)
    async fn send_keys(&self, id: &str, keys: &str) -> Result<(), SessionError>;

    /// Send literal text (no key interpretation)
    async fn send_literal(&self, id: &str, text: &str) -> Result<(), SessionError>;

    /// Send the Enter key
    async fn send_enter(&self, id: &str) -> Result<(), SessionError>;

    /// Kill the session. Killing an absent session is not an error.
    async fn kill(&self, id: &str) -> Result<(), SessionError>;

    /// Whether the session currently exists
    async fn exists(&self, id: &str) -> Result<bool, SessionError>;

    /// Capture up to `lines` trailing lines of scrollback as UTF-8 text
    async fn capture(&self, id: &str, lines: u32) -> Result<String, SessionError>;

    /// PID of the session's main child process, if available
    async fn pane_pid(&self, id: &str) -> Result<Option<u32>, SessionError>;

    /// Stop the session's child process (SIGSTOP)
    async fn pause(&self, id: &str) -> Result<(), SessionError>;

    /// Continue the session's child process (SIGCONT)
    async fn resume(&self, id: &str) -> Result<(), SessionError>;

    /// Whether the session's child process is currently stopped
    async fn is_stopped(&self, id: &str) -> Result<bool, SessionError>;

    /// Attach to the session, or switch to it when already inside one
    async fn attach(&self, id: &str) -> Result<(), SessionError>;
}
