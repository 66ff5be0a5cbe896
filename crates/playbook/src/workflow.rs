// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow definitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One stage of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDef {
    pub name: String,
    /// Template the stage agent is spawned from
    #[serde(default = "default_template_name")]
    pub template: String,
    /// Prompt text with `{task}` and earlier `pass_to_next` tokens
    pub prompt: String,
    /// Slot name under which this stage's output is exposed to later stages
    #[serde(default)]
    pub pass_to_next: Option<String>,
}

fn default_template_name() -> String {
    "default".to_string()
}

/// A named multi-stage plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDef {
    /// Workflow name (defaults to the document's file stem)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Run all stages at once instead of in declaration order
    #[serde(default)]
    pub parallel: bool,
    pub stages: Vec<StageDef>,
}

impl WorkflowDef {
    /// Structural validation, run before any side effect.
    pub fn validate(&self) -> Result<(), String> {
        if self.stages.is_empty() {
            return Err(format!("workflow {:?} has no stages", self.name));
        }
        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.name.is_empty() {
                return Err(format!("stage[{i}] has no name"));
            }
            if !names.insert(stage.name.as_str()) {
                return Err(format!("duplicate stage name {:?}", stage.name));
            }
            if stage.prompt.is_empty() {
                return Err(format!("stage {:?} has an empty prompt", stage.name));
            }
            if let Some(ref key) = stage.pass_to_next {
                if key == "task" {
                    return Err(format!(
                        "stage {:?}: pass_to_next key \"task\" collides with the task token",
                        stage.name
                    ));
                }
                if !keys.insert(key.as_str()) {
                    return Err(format!("duplicate pass_to_next key {:?}", key));
                }
            }
        }
        Ok(())
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name.clone()).collect()
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
