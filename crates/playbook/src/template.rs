// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent template definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the agent should do when it considers its task finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnComplete {
    /// Write a completion signal (the default)
    #[default]
    Signal,
    /// No automatic reaction
    None,
}

/// An agent template: how to invoke the underlying agent for a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDef {
    /// Template name (defaults to the document's file stem)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Argument list passed to the underlying agent
    #[serde(default = "default_base_args")]
    pub base_args: Vec<String>,
    /// Extra environment variables for the session
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub denied_tools: Vec<String>,
    /// Prepended to every prompt, separated by a blank line
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Prepended directly before the user task
    #[serde(default)]
    pub prompt_prefix: Option<String>,
    #[serde(default)]
    pub on_complete: OnComplete,
}

fn default_base_args() -> Vec<String> {
    vec!["claude".to_string()]
}

impl Default for TemplateDef {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            description: "Built-in default template".to_string(),
            base_args: default_base_args(),
            env: HashMap::new(),
            allowed_tools: Vec::new(),
            denied_tools: Vec::new(),
            system_prompt: None,
            prompt_prefix: None,
            on_complete: OnComplete::Signal,
        }
    }
}

impl TemplateDef {
    /// Build the shell command that starts the agent.
    ///
    /// Tool allow/deny lists become the agent's own CLI flags; base_args are
    /// taken verbatim.
    pub fn build_command(&self) -> String {
        let mut parts = self.base_args.clone();
        if !self.allowed_tools.is_empty() {
            parts.push("--allowedTools".to_string());
            parts.push(self.allowed_tools.join(","));
        }
        if !self.denied_tools.is_empty() {
            parts.push("--disallowedTools".to_string());
            parts.push(self.denied_tools.join(","));
        }
        parts.join(" ")
    }

    /// The effective prompt for a user task:
    /// `system_prompt` + blank line + `prompt_prefix` + task.
    pub fn effective_prompt(&self, task: &str) -> String {
        let mut prompt = String::new();
        if let Some(ref system) = self.system_prompt {
            if !system.is_empty() {
                prompt.push_str(system);
                prompt.push_str("\n\n");
            }
        }
        if let Some(ref prefix) = self.prompt_prefix {
            prompt.push_str(prefix);
        }
        prompt.push_str(task);
        prompt
    }

    /// Environment entries as a vec, for the session adapter.
    pub fn env_vec(&self) -> Vec<(String, String)> {
        self.env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
