// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn msg(state: MessageState) -> Message {
    Message {
        id: MessageId::new("m-1"),
        from: "user".into(),
        to: AgentName::parse("w1").unwrap(),
        kind: MessageKind::User,
        content: "hello".into(),
        sent_at_ms: 1,
        state,
    }
}

#[parameterized(
    help_request = { MessageKind::HelpRequest, "help_request" },
    help_response = { MessageKind::HelpResponse, "help_response" },
    handoff = { MessageKind::Handoff, "handoff" },
    shared_artifact = { MessageKind::SharedArtifact, "shared_artifact" },
    broadcast = { MessageKind::Broadcast, "broadcast" },
    group_message = { MessageKind::GroupMessage, "group_message" },
    user = { MessageKind::User, "user" },
)]
fn kind_str_roundtrip(kind: MessageKind, tag: &str) {
    assert_eq!(kind.as_str(), tag);
    assert_eq!(tag.parse::<MessageKind>().unwrap(), kind);
    assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{tag}\""));
}

#[test]
fn unknown_kind_fails_to_parse() {
    assert!("shout".parse::<MessageKind>().is_err());
}

#[test]
fn pending_state_is_pending() {
    assert!(msg(MessageState::Pending).is_pending());
    assert!(!msg(MessageState::Read).is_pending());
}

#[test]
fn message_serde_roundtrip() {
    let m = msg(MessageState::Pending);
    let json = serde_json::to_string(&m).unwrap();
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, m.id);
    assert_eq!(back.to, m.to);
    assert_eq!(back.kind, m.kind);
    assert_eq!(back.state, MessageState::Pending);
}
