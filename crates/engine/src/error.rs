// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error type.

use daedalos_adapters::SessionError;
use daedalos_playbook::PlaybookError;
use daedalos_storage::{
    ArtifactError, ClaimError, HandoffError, LockError, MessageError, RegistryError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by engine operations.
///
/// Mostly transparent wrappers: the CLI classifies them (validation vs
/// fatal) for exit codes, so the underlying variants must stay visible.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Playbook(#[from] PlaybookError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Handoff(#[from] HandoffError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("unknown workflow instance: {0}")]
    UnknownInstance(String),

    #[error("unknown snapshot: {0}")]
    UnknownSnapshot(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether this is a caller mistake (bad input) rather than an engine
    /// or environment failure. The CLI maps these to exit code 2.
    pub fn is_validation(&self) -> bool {
        match self {
            EngineError::Registry(e) => matches!(
                e,
                RegistryError::Name(_)
                    | RegistryError::DuplicateName(_)
                    | RegistryError::NoSlot(_)
                    | RegistryError::UnknownAgent(_)
            ),
            EngineError::Message(MessageError::UnknownRecipient(_)) => true,
            EngineError::Playbook(e) => matches!(
                e,
                PlaybookError::UnknownTemplate(_)
                    | PlaybookError::UnknownWorkflow(_)
                    | PlaybookError::Parse { .. }
            ),
            EngineError::Lock(LockError::InvalidName(_)) => true,
            EngineError::Claim(e) => matches!(
                e,
                ClaimError::InvalidTaskId(_) | ClaimError::AlreadyClaimed { .. }
            ),
            EngineError::Handoff(e) => matches!(
                e,
                HandoffError::UnknownHandoff(_) | HandoffError::NotAddressee { .. }
            ),
            EngineError::UnknownAgent(_)
            | EngineError::UnknownInstance(_)
            | EngineError::UnknownSnapshot(_) => true,
            _ => false,
        }
    }
}
