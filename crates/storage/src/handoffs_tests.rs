// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::paths::DataRoot;
use daedalos_core::test_support::name;
use daedalos_core::SequentialIdGen;

struct Fixture {
    _tmp: tempfile::TempDir,
    registry: Registry,
    messages: MessageStore,
    handoffs: HandoffStore,
    ids: SequentialIdGen,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    let mut registry = Registry::open(&root, daedalos_core::DEFAULT_MAX_SLOTS).unwrap();
    for agent in ["a", "b"] {
        registry
            .create(agent, "/tmp/p".into(), "default".into(), None, 1000)
            .unwrap();
    }
    Fixture {
        messages: MessageStore::new(&root),
        handoffs: HandoffStore::new(&root),
        registry,
        ids: SequentialIdGen::new("h"),
        _tmp: tmp,
    }
}

#[test]
fn create_delivers_a_handoff_message() {
    let f = fixture();
    let id = f
        .handoffs
        .create(
            &f.registry,
            &f.messages,
            &name("a"),
            &name("b"),
            "here is my context",
            &f.ids,
            5,
        )
        .unwrap();

    let inbox = f.messages.inbox(&name("b"), false);
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, daedalos_core::MessageKind::Handoff);
    assert!(inbox[0].content.contains(id.as_str()));

    let handoff = f.handoffs.get(&id).unwrap();
    assert_eq!(handoff.status, daedalos_core::HandoffStatus::Pending);
}

#[test]
fn accept_returns_context_and_flips_status() {
    let f = fixture();
    let id = f
        .handoffs
        .create(
            &f.registry,
            &f.messages,
            &name("a"),
            &name("b"),
            "the context",
            &f.ids,
            5,
        )
        .unwrap();

    let context = f.handoffs.accept(&id, &name("b")).unwrap();
    assert_eq!(context, "the context");
    assert_eq!(
        f.handoffs.get(&id).unwrap().status,
        daedalos_core::HandoffStatus::Accepted
    );
}

#[test]
fn accept_by_wrong_agent_fails() {
    let f = fixture();
    let id = f
        .handoffs
        .create(
            &f.registry,
            &f.messages,
            &name("a"),
            &name("b"),
            "ctx",
            &f.ids,
            5,
        )
        .unwrap();
    assert!(matches!(
        f.handoffs.accept(&id, &name("a")),
        Err(HandoffError::NotAddressee { .. })
    ));
}

#[test]
fn double_accept_fails() {
    let f = fixture();
    let id = f
        .handoffs
        .create(
            &f.registry,
            &f.messages,
            &name("a"),
            &name("b"),
            "ctx",
            &f.ids,
            5,
        )
        .unwrap();
    f.handoffs.accept(&id, &name("b")).unwrap();
    assert!(matches!(
        f.handoffs.accept(&id, &name("b")),
        Err(HandoffError::AlreadyAccepted(_))
    ));
}

#[test]
fn create_to_unknown_recipient_fails() {
    let f = fixture();
    assert!(f
        .handoffs
        .create(
            &f.registry,
            &f.messages,
            &name("a"),
            &name("ghost"),
            "ctx",
            &f.ids,
            5,
        )
        .is_err());
}

#[test]
fn unknown_handoff_accept_fails() {
    let f = fixture();
    assert!(matches!(
        f.handoffs.accept(&daedalos_core::HandoffId::new("nope"), &name("b")),
        Err(HandoffError::UnknownHandoff(_))
    ));
}
