// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playbook document parsing (TOML, HCL, and JSON)

use crate::template::TemplateDef;
use crate::workflow::WorkflowDef;
use std::path::Path;
use thiserror::Error;

/// Playbook document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Hcl,
    Json,
}

impl Format {
    /// Pick a format from a file extension; unknown extensions are skipped
    /// by the loader.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Format::Toml),
            Some("hcl") => Some(Format::Hcl),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// Errors that can occur during playbook parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid workflow: {0}")]
    InvalidWorkflow(String),
}

/// Parse a template document in the given format.
pub fn parse_template(content: &str, format: Format) -> Result<TemplateDef, ParseError> {
    let template: TemplateDef = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Hcl => hcl::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    Ok(template)
}

/// Parse and validate a workflow document in the given format.
pub fn parse_workflow(content: &str, format: Format) -> Result<WorkflowDef, ParseError> {
    let workflow: WorkflowDef = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Hcl => hcl::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    workflow.validate().map_err(ParseError::InvalidWorkflow)?;
    Ok(workflow)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
