// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playbook loading and lookup.

use crate::parser::{self, Format, ParseError};
use crate::template::TemplateDef;
use crate::workflow::WorkflowDef;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from playbook loading and lookup
#[derive(Debug, Error)]
pub enum PlaybookError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ParseError,
    },

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("unknown workflow: {0}")]
    UnknownWorkflow(String),
}

/// The loaded template and workflow collections.
///
/// Document names default to the file stem; an explicit `name` key wins.
/// Lookup for `"default"` always succeeds — the built-in template backs it
/// when no document overrides it.
#[derive(Debug, Clone, Default)]
pub struct Playbook {
    templates: IndexMap<String, TemplateDef>,
    workflows: IndexMap<String, WorkflowDef>,
}

impl Playbook {
    /// Load all documents under the given directories.
    ///
    /// Missing directories yield an empty collection; files with unknown
    /// extensions are skipped. Files load in name order so collisions
    /// resolve deterministically (later wins).
    pub fn load(templates_dir: &Path, workflows_dir: &Path) -> Result<Self, PlaybookError> {
        let mut playbook = Playbook::default();
        for path in sorted_documents(templates_dir)? {
            let (content, format) = read_document(&path)?;
            let mut template =
                parser::parse_template(&content, format).map_err(|source| PlaybookError::Parse {
                    path: path.clone(),
                    source,
                })?;
            if template.name.is_empty() {
                template.name = file_stem(&path);
            }
            if let Some(_prev) = playbook.templates.insert(template.name.clone(), template) {
                tracing::warn!(path = %path.display(), "template redefined, later document wins");
            }
        }
        for path in sorted_documents(workflows_dir)? {
            let (content, format) = read_document(&path)?;
            let mut workflow =
                parser::parse_workflow(&content, format).map_err(|source| PlaybookError::Parse {
                    path: path.clone(),
                    source,
                })?;
            if workflow.name.is_empty() {
                workflow.name = file_stem(&path);
            }
            if let Some(_prev) = playbook.workflows.insert(workflow.name.clone(), workflow) {
                tracing::warn!(path = %path.display(), "workflow redefined, later document wins");
            }
        }
        Ok(playbook)
    }

    /// Look up a template; `"default"` falls back to the built-in.
    pub fn template(&self, name: &str) -> Result<TemplateDef, PlaybookError> {
        if let Some(template) = self.templates.get(name) {
            return Ok(template.clone());
        }
        if name == "default" {
            return Ok(TemplateDef::default());
        }
        Err(PlaybookError::UnknownTemplate(name.to_string()))
    }

    pub fn workflow(&self, name: &str) -> Result<&WorkflowDef, PlaybookError> {
        self.workflows
            .get(name)
            .ok_or_else(|| PlaybookError::UnknownWorkflow(name.to_string()))
    }

    pub fn templates(&self) -> impl Iterator<Item = &TemplateDef> {
        self.templates.values()
    }

    pub fn workflows(&self) -> impl Iterator<Item = &WorkflowDef> {
        self.workflows.values()
    }

    /// Insert a template directly (tests and built-in defaults).
    pub fn add_template(&mut self, template: TemplateDef) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Insert a workflow directly (tests).
    pub fn add_workflow(&mut self, workflow: WorkflowDef) {
        self.workflows.insert(workflow.name.clone(), workflow);
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn read_document(path: &Path) -> Result<(String, Format), PlaybookError> {
    // from_path returned Some for everything sorted_documents yields
    let format = Format::from_path(path).unwrap_or(Format::Toml);
    let content = std::fs::read_to_string(path).map_err(|source| PlaybookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((content, format))
}

fn sorted_documents(dir: &Path) -> Result<Vec<PathBuf>, PlaybookError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| PlaybookError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && Format::from_path(p).is_some())
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "library_tests.rs"]
mod tests;
