// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scrollback status detection.
//!
//! Pure classification of one scrollback capture into an [`AgentStatus`].
//! Rules run in priority order; the first match wins. ANSI escapes are
//! stripped before any matching so TUI redraws don't confuse the markers.

use daedalos_core::AgentStatus;
use regex::Regex;
use std::sync::LazyLock;

/// How many trailing scrollback lines the detector considers.
pub const DEFAULT_TAIL_LINES: usize = 50;

/// How many trailing lines count as "the tail" for prompt/footer rules.
const TAIL_WINDOW: usize = 5;

/// Spinner glyphs and long-task markers: the agent is thinking.
const THINKING_MARKERS: &[&str] = &[
    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✻", "✽", "esc to interrupt", "Thinking…",
];

/// Tool-invocation markers: the agent is actively running tools.
const TOOL_MARKERS: &[&str] = &["⏺", "<function_calls>", "tool_use"];

/// Cost/usage footer: the agent finished speaking.
const FOOTER_MARKERS: &[&str] = &["Total cost:", "Total duration", "tokens used"];

/// Interactive yes/no prompts: the agent is waiting on a human.
const CONFIRM_MARKERS: &[&str] = &[
    "(y/n)",
    "[y/N]",
    "[Y/n]",
    "Do you want to proceed?",
    "1. Yes",
    "2. No",
];

/// Standard input prompt markers: the agent is idle at its prompt.
const PROMPT_MARKERS: &[&str] = &["❯", "│ >"];

/// Failure words, matched case-insensitively anywhere in recent output.
const ERROR_MARKERS: &[&str] = &["error", "failed", "panic", "exception", "permission denied"];

// CSI sequences (colors, cursor movement) and OSC sequences (titles).
#[allow(clippy::expect_used)]
static ANSI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
        .expect("constant regex pattern is valid")
});

/// What the session backend reports about the session itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub exists: bool,
    pub stopped: bool,
}

impl SessionState {
    pub fn live() -> Self {
        Self {
            exists: true,
            stopped: false,
        }
    }

    pub fn gone() -> Self {
        Self {
            exists: false,
            stopped: false,
        }
    }

    pub fn paused() -> Self {
        Self {
            exists: true,
            stopped: true,
        }
    }
}

/// Remove ANSI escape sequences.
pub fn strip_ansi(input: &str) -> String {
    ANSI_PATTERN.replace_all(input, "").to_string()
}

/// Classify one scrollback capture.
///
/// Only the last [`DEFAULT_TAIL_LINES`] lines are considered; "tail" rules
/// look at the last few non-empty lines only.
pub fn detect(scrollback: &str, session: SessionState) -> AgentStatus {
    if session.stopped {
        return AgentStatus::Paused;
    }
    if !session.exists {
        return AgentStatus::Dead;
    }

    let clean = strip_ansi(scrollback);
    let lines: Vec<&str> = clean.lines().collect();
    let recent: Vec<&str> = lines
        .iter()
        .skip(lines.len().saturating_sub(DEFAULT_TAIL_LINES))
        .copied()
        .collect();
    let recent_text = recent.join("\n");
    let tail: Vec<&str> = recent
        .iter()
        .rev()
        .filter(|l| !l.trim().is_empty())
        .take(TAIL_WINDOW)
        .copied()
        .collect();
    let tail_text = tail.join("\n");

    if contains_any(&recent_text, THINKING_MARKERS) {
        return AgentStatus::Thinking;
    }
    if contains_any(&recent_text, TOOL_MARKERS) {
        return AgentStatus::Active;
    }
    if contains_any(&tail_text, FOOTER_MARKERS) {
        return AgentStatus::Idle;
    }
    if contains_any(&tail_text, CONFIRM_MARKERS) {
        return AgentStatus::Waiting;
    }
    if contains_any(&tail_text, PROMPT_MARKERS) || tail.iter().any(|l| is_bare_prompt(l)) {
        return AgentStatus::Idle;
    }
    let lower = recent_text.to_lowercase();
    if ERROR_MARKERS.iter().any(|m| lower.contains(m)) {
        return AgentStatus::Error;
    }

    // No marker matched: call it active while the last lines carry output
    let last_five = lines.iter().rev().take(5).collect::<Vec<_>>();
    if !last_five.is_empty() && last_five.iter().all(|l| !l.trim().is_empty()) {
        AgentStatus::Active
    } else {
        AgentStatus::Idle
    }
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| haystack.contains(m))
}

/// A shell-style input prompt on its own: `>` or `> ` with nothing typed.
fn is_bare_prompt(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == ">" || trimmed.starts_with("> ")
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
