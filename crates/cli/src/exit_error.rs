// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit-code carrying error wrapper.
//!
//! `0` success, `1` fatal error or timeout, `2` validation error.

use daedalos_engine::EngineError;
use std::fmt;

/// An error with an explicit process exit code.
#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub source: anyhow::Error,
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for ExitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.chain().next()
    }
}

/// Wrap an engine error with the exit code its class maps to.
pub fn classify(err: EngineError) -> anyhow::Error {
    let code = if err.is_validation() { 2 } else { 1 };
    anyhow::Error::new(ExitError {
        code,
        source: anyhow::Error::new(err),
    })
}

/// A timeout outcome: message plus exit code 1.
pub fn timeout(message: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(ExitError {
        code: 1,
        source: anyhow::anyhow!(message.into()),
    })
}

/// A validation failure produced by the CLI itself.
pub fn validation(message: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(ExitError {
        code: 2,
        source: anyhow::anyhow!(message.into()),
    })
}
