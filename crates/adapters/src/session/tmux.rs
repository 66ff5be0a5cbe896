// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{SessionAdapter, SessionError};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Tmux-based session adapter
#[derive(Clone, Default)]
pub struct TmuxAdapter;

impl TmuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

async fn tmux(args: &[&str]) -> Result<std::process::Output, SessionError> {
    Command::new("tmux")
        .args(args)
        .output()
        .await
        .map_err(|e| SessionError::CommandFailed(e.to_string()))
}

/// Resolve the session's pane PID via `list-panes`.
async fn pane_pid_of(id: &str) -> Result<Option<u32>, SessionError> {
    let output = tmux(&["list-panes", "-t", id, "-F", "#{pane_pid}"]).await?;
    if !output.status.success() {
        return Err(SessionError::Gone(id.to_string()));
    }
    let pid = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<u32>().ok());
    Ok(pid)
}

/// Send a signal to the session's pane process.
async fn signal_pane(id: &str, signal: &str) -> Result<(), SessionError> {
    let Some(pid) = pane_pid_of(id).await? else {
        return Err(SessionError::Gone(id.to_string()));
    };
    let pid_arg = pid.to_string();
    let output = Command::new("kill")
        .args([signal, pid_arg.as_str()])
        .output()
        .await
        .map_err(|e| SessionError::CommandFailed(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SessionError::CommandFailed(format!(
            "kill {signal} {pid}: {stderr}"
        )));
    }
    Ok(())
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, SessionError> {
        // Precondition: cwd must exist
        if !cwd.exists() {
            return Err(SessionError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        // A leftover homonym session means a previous agent died without
        // cleanup; replace it.
        let existing = tmux(&["has-session", "-t", name]).await;
        if existing.map(|o| o.status.success()).unwrap_or(false) {
            tracing::warn!(session = name, "session already exists, killing first");
            let _ = tmux(&["kill-session", "-t", name]).await;
        }

        let mut tmux_cmd = Command::new("tmux");
        tmux_cmd
            .arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(name)
            .arg("-c")
            .arg(cwd);

        for (key, value) in env {
            tmux_cmd.arg("-e").arg(format!("{}={}", key, value));
        }

        tmux_cmd.arg(cmd);

        let output = tmux_cmd
            .output()
            .await
            .map_err(|e| SessionError::SpawnFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = name, stderr = %stderr, "tmux spawn failed");
            return Err(SessionError::SpawnFailed(stderr.to_string()));
        }

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session = name, stderr = %stderr, "tmux spawn stderr (non-fatal)");
        }

        Ok(name.to_string())
    }

    async fn send_keys(&self, id: &str, keys: &str) -> Result<(), SessionError> {
        let output = tmux(&["send-keys", "-t", id, keys]).await?;
        if !output.status.success() {
            return Err(SessionError::Gone(id.to_string()));
        }
        Ok(())
    }

    async fn send_literal(&self, id: &str, text: &str) -> Result<(), SessionError> {
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        let output = tmux(&["send-keys", "-t", id, "-l", "--", text]).await?;
        if !output.status.success() {
            return Err(SessionError::Gone(id.to_string()));
        }
        Ok(())
    }

    async fn send_enter(&self, id: &str) -> Result<(), SessionError> {
        let output = tmux(&["send-keys", "-t", id, "Enter"]).await?;
        if !output.status.success() {
            return Err(SessionError::Gone(id.to_string()));
        }
        Ok(())
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        // Session might already be dead, which is fine
        let _ = tmux(&["kill-session", "-t", id]).await?;
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, SessionError> {
        let output = tmux(&["has-session", "-t", id]).await?;
        Ok(output.status.success())
    }

    async fn capture(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        let start = format!("-{}", lines);
        let output = tmux(&["capture-pane", "-t", id, "-p", "-S", start.as_str()]).await?;
        if !output.status.success() {
            return Err(SessionError::Gone(id.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn pane_pid(&self, id: &str) -> Result<Option<u32>, SessionError> {
        pane_pid_of(id).await
    }

    async fn pause(&self, id: &str) -> Result<(), SessionError> {
        signal_pane(id, "-STOP").await
    }

    async fn resume(&self, id: &str) -> Result<(), SessionError> {
        signal_pane(id, "-CONT").await
    }

    async fn is_stopped(&self, id: &str) -> Result<bool, SessionError> {
        let Some(pid) = pane_pid_of(id).await? else {
            return Ok(false);
        };
        let pid_arg = pid.to_string();
        let output = Command::new("ps")
            .args(["-o", "state=", "-p", pid_arg.as_str()])
            .output()
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))?;
        let state = String::from_utf8_lossy(&output.stdout);
        Ok(state.trim_start().starts_with('T'))
    }

    async fn attach(&self, id: &str) -> Result<(), SessionError> {
        // Inside a session already: switch the client instead of nesting
        let inside = std::env::var_os("TMUX").is_some();
        let output = if inside {
            tmux(&["switch-client", "-t", id]).await?
        } else {
            let status = Command::new("tmux")
                .args(["attach-session", "-t", id])
                .status()
                .await
                .map_err(|e| SessionError::CommandFailed(e.to_string()))?;
            if !status.success() {
                return Err(SessionError::Gone(id.to_string()));
            }
            return Ok(());
        };
        if !output.status.success() {
            return Err(SessionError::Gone(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
