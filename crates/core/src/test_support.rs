// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders and helpers shared by other crates' tests.

#![allow(clippy::unwrap_used)]

use crate::agent::{AgentName, AgentRecord};
use crate::message::{Message, MessageId, MessageKind, MessageState};
use crate::signal::{CompletionSignal, SignalStatus};

/// Parse a name that tests know to be valid.
pub fn name(s: &str) -> AgentName {
    AgentName::parse(s).unwrap()
}

/// A registry record with sensible defaults.
pub fn agent_record(n: &str, slot: u32) -> AgentRecord {
    AgentRecord::new(name(n), slot, "/tmp/project".into(), "default".into(), 1_000_000)
}

/// A pending user message.
pub fn user_message(id: &str, from: &str, to: &str, content: &str) -> Message {
    Message {
        id: MessageId::new(id),
        from: from.to_string(),
        to: name(to),
        kind: MessageKind::User,
        content: content.to_string(),
        sent_at_ms: 1_000_000,
        state: MessageState::Pending,
    }
}

/// A success signal with optional payload.
pub fn success_signal(agent: &str, data: Option<&str>) -> CompletionSignal {
    CompletionSignal {
        agent: name(agent),
        status: SignalStatus::Success,
        data: data.map(str::to_string),
        signaled_at_ms: 1_000_000,
    }
}
