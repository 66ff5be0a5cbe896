// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle hooks: opaque executables in per-event directories.
//!
//! Every executable in `hooks/<event>/` runs sequentially with a documented
//! environment. A failing hook is logged and never blocks the action that
//! triggered it.

use daedalos_storage::DataRoot;
use std::fmt;
use std::path::PathBuf;
use tokio::process::Command;

/// The events the lifecycle manager fires hooks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    OnSpawn,
    OnComplete,
    OnError,
    OnKill,
    OnWorkflowComplete,
}

impl HookEvent {
    pub const ALL: [HookEvent; 5] = [
        HookEvent::OnSpawn,
        HookEvent::OnComplete,
        HookEvent::OnError,
        HookEvent::OnKill,
        HookEvent::OnWorkflowComplete,
    ];

    /// Directory name under `hooks/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            HookEvent::OnSpawn => "on_spawn",
            HookEvent::OnComplete => "on_complete",
            HookEvent::OnError => "on_error",
            HookEvent::OnKill => "on_kill",
            HookEvent::OnWorkflowComplete => "on_workflow_complete",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl std::str::FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::ALL
            .into_iter()
            .find(|e| e.dir_name() == s)
            .ok_or_else(|| format!("unknown hook event: {s}"))
    }
}

/// Environment handed to every hook.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub event: HookEvent,
    pub agent: &'a str,
    pub data: &'a str,
    pub project: Option<&'a str>,
    pub template: Option<&'a str>,
    pub status: Option<&'a str>,
}

/// Run every enabled hook for the event, in name order.
///
/// Hook failures (spawn errors, nonzero exits) are logged per hook and
/// swallowed.
pub async fn run_hooks(root: &DataRoot, ctx: HookContext<'_>) {
    for path in executables(root, ctx.event) {
        let mut command = Command::new(&path);
        command
            .env("DAEDALOS_EVENT", ctx.event.dir_name())
            .env("DAEDALOS_AGENT_NAME", ctx.agent)
            .env("DAEDALOS_HOOK_DATA", ctx.data)
            .env("DAEDALOS_DATA_ROOT", root.path());
        if let Some(project) = ctx.project {
            command.env("DAEDALOS_AGENT_PROJECT", project);
        }
        if let Some(template) = ctx.template {
            command.env("DAEDALOS_AGENT_TEMPLATE", template);
        }
        if let Some(status) = ctx.status {
            command.env("DAEDALOS_AGENT_STATUS", status);
        }
        match command.output().await {
            Ok(output) if output.status.success() => {
                tracing::debug!(hook = %path.display(), event = %ctx.event, "hook ran");
            }
            Ok(output) => {
                tracing::warn!(
                    hook = %path.display(),
                    event = %ctx.event,
                    code = output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "hook exited nonzero"
                );
            }
            Err(e) => {
                tracing::warn!(hook = %path.display(), event = %ctx.event, error = %e, "hook failed to run");
            }
        }
    }
}

/// Enabled (executable) hooks for an event, in name order.
pub fn executables(root: &DataRoot, event: HookEvent) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root.hook_event_dir(event.dir_name())) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_executable(p))
        .collect();
    paths.sort();
    paths
}

/// All hooks for an event (enabled or not), in name order.
pub fn list(root: &DataRoot, event: HookEvent) -> Vec<(PathBuf, bool)> {
    let Ok(entries) = std::fs::read_dir(root.hook_event_dir(event.dir_name())) else {
        return Vec::new();
    };
    let mut hooks: Vec<(PathBuf, bool)> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .map(|p| {
            let enabled = is_executable(&p);
            (p, enabled)
        })
        .collect();
    hooks.sort();
    hooks
}

/// Install a script into an event directory.
pub fn add(root: &DataRoot, event: HookEvent, script: &std::path::Path) -> std::io::Result<PathBuf> {
    let dir = root.hook_event_dir(event.dir_name());
    std::fs::create_dir_all(&dir)?;
    let file_name = script
        .file_name()
        .ok_or_else(|| std::io::Error::other("hook script has no file name"))?;
    let target = dir.join(file_name);
    std::fs::copy(script, &target)?;
    set_executable(&target, true)?;
    Ok(target)
}

/// Remove a hook by file name.
pub fn remove(root: &DataRoot, event: HookEvent, name: &str) -> std::io::Result<()> {
    std::fs::remove_file(root.hook_event_dir(event.dir_name()).join(name))
}

/// Enable or disable a hook by toggling its executable bit.
pub fn set_enabled(
    root: &DataRoot,
    event: HookEvent,
    name: &str,
    enabled: bool,
) -> std::io::Result<()> {
    set_executable(&root.hook_event_dir(event.dir_name()).join(name), enabled)
}

/// Write a starter hook script.
pub fn create(root: &DataRoot, event: HookEvent, name: &str) -> std::io::Result<PathBuf> {
    let dir = root.hook_event_dir(event.dir_name());
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\n# {event} hook: runs with DAEDALOS_EVENT, DAEDALOS_AGENT_NAME,\n# DAEDALOS_HOOK_DATA, and DAEDALOS_AGENT_PROJECT/TEMPLATE/STATUS when set.\necho \"$DAEDALOS_EVENT $DAEDALOS_AGENT_NAME\" >> \"$DAEDALOS_DATA_ROOT/hooks.log\"\n",
        event = event.dir_name()
    );
    std::fs::write(&path, script)?;
    set_executable(&path, true)?;
    Ok(path)
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(unix)]
fn set_executable(path: &std::path::Path, enabled: bool) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(path)?;
    let mut permissions = metadata.permissions();
    let mode = if enabled {
        permissions.mode() | 0o755
    } else {
        permissions.mode() & !0o111
    };
    permissions.set_mode(mode);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn is_executable(_path: &std::path::Path) -> bool {
    true
}

#[cfg(not(unix))]
fn set_executable(_path: &std::path::Path, _enabled: bool) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
