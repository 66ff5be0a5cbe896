// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers, grouped by component.

pub mod claim;
pub mod handoff;
pub mod hook;
pub mod lifecycle;
pub mod lock;
pub mod messaging;
pub mod signal;
pub mod workflow;

use daedalos_core::{SystemClock, SystemProcessProbe, UuidIdGen};
use daedalos_engine::Engine;
use std::time::Duration;

/// The production engine type every handler takes.
pub type ProdEngine = Engine<daedalos_adapters::TmuxAdapter, SystemClock, SystemProcessProbe, UuidIdGen>;

/// Parse `KEY=VALUE` pairs for `--env`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

/// Parse a human duration: `30s`, `5m`, `1h`, or plain seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (value, unit) = match s.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => s.split_at(s.len() - 1),
        _ => (s, "s"),
    };
    let n: u64 = value
        .parse()
        .map_err(|_| format!("invalid duration: {s:?}"))?;
    match unit {
        "s" => Ok(Duration::from_secs(n)),
        "m" => Ok(Duration::from_secs(n * 60)),
        "h" => Ok(Duration::from_secs(n * 3600)),
        other => Err(format!("invalid duration unit {other:?} in {s:?}")),
    }
}

/// The calling agent's identity: `$AGENT_NAME` inside a session, `user`
/// outside one.
pub fn caller_identity(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var("AGENT_NAME").ok())
        .unwrap_or_else(|| "user".to_string())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
