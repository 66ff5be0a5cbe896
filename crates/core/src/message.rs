// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message records for per-agent queues.

use crate::agent::AgentName;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a queued message.
    pub struct MessageId;
}

/// Kind of a message, carried on the wire as a snake_case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    HelpRequest,
    HelpResponse,
    Handoff,
    SharedArtifact,
    Broadcast,
    GroupMessage,
    User,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::HelpRequest => "help_request",
            MessageKind::HelpResponse => "help_response",
            MessageKind::Handoff => "handoff",
            MessageKind::SharedArtifact => "shared_artifact",
            MessageKind::Broadcast => "broadcast",
            MessageKind::GroupMessage => "group_message",
            MessageKind::User => "user",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help_request" => Ok(MessageKind::HelpRequest),
            "help_response" => Ok(MessageKind::HelpResponse),
            "handoff" => Ok(MessageKind::Handoff),
            "shared_artifact" => Ok(MessageKind::SharedArtifact),
            "broadcast" => Ok(MessageKind::Broadcast),
            "group_message" => Ok(MessageKind::GroupMessage),
            "user" => Ok(MessageKind::User),
            other => Err(format!("unknown message kind: {other}")),
        }
    }
}

/// Read state of a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageState {
    Pending,
    Read,
}

/// One record in a recipient's queue.
///
/// `from` is a free-form sender tag rather than an [`AgentName`]: the user
/// and external tools send messages too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from: String,
    pub to: AgentName,
    pub kind: MessageKind,
    pub content: String,
    pub sent_at_ms: u64,
    pub state: MessageState,
}

impl Message {
    pub fn is_pending(&self) -> bool {
        self.state == MessageState::Pending
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
