// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::paths::DataRoot;
use crate::registry::Registry;
use daedalos_core::test_support::name;
use daedalos_core::SequentialIdGen;

struct Fixture {
    _tmp: tempfile::TempDir,
    registry: Registry,
    store: MessageStore,
    ids: SequentialIdGen,
}

fn fixture(agents: &[&str]) -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    let mut registry = Registry::open(&root, daedalos_core::DEFAULT_MAX_SLOTS).unwrap();
    for agent in agents {
        registry
            .create(agent, "/tmp/p".into(), "default".into(), None, 1000)
            .unwrap();
    }
    Fixture {
        store: MessageStore::new(&root),
        registry,
        ids: SequentialIdGen::new("m"),
        _tmp: tmp,
    }
}

#[test]
fn send_to_unknown_recipient_fails() {
    let f = fixture(&["b"]);
    let err = f
        .store
        .send(
            &f.registry,
            &name("ghost"),
            "a",
            MessageKind::User,
            "hi",
            &f.ids,
            1,
        )
        .unwrap_err();
    assert!(matches!(err, MessageError::UnknownRecipient(_)));
}

#[test]
fn inbox_is_fifo_across_senders() {
    let f = fixture(&["b"]);
    let b = name("b");
    for (from, content) in [("a", "one"), ("a", "two"), ("c", "three")] {
        f.store
            .send(&f.registry, &b, from, MessageKind::User, content, &f.ids, 1)
            .unwrap();
    }
    let contents: Vec<String> = f
        .store
        .inbox(&b, false)
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}

#[test]
fn pending_only_hides_read_messages() {
    let f = fixture(&["b"]);
    let b = name("b");
    let first = f
        .store
        .send(&f.registry, &b, "a", MessageKind::User, "one", &f.ids, 1)
        .unwrap();
    f.store
        .send(&f.registry, &b, "a", MessageKind::User, "two", &f.ids, 1)
        .unwrap();

    let changed = f.store.mark_read(&b, MarkTarget::One(first)).unwrap();
    assert_eq!(changed, 1);

    let pending = f.store.inbox(&b, true);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content, "two");
    // Full inbox still shows both
    assert_eq!(f.store.inbox(&b, false).len(), 2);
}

#[test]
fn mark_read_all_promotes_everything_once() {
    let f = fixture(&["b"]);
    let b = name("b");
    for content in ["one", "two"] {
        f.store
            .send(&f.registry, &b, "a", MessageKind::User, content, &f.ids, 1)
            .unwrap();
    }
    assert_eq!(f.store.mark_read(&b, MarkTarget::All).unwrap(), 2);
    assert_eq!(f.store.mark_read(&b, MarkTarget::All).unwrap(), 0);
}

#[test]
fn clear_retains_only_pending() {
    let f = fixture(&["b"]);
    let b = name("b");
    let first = f
        .store
        .send(&f.registry, &b, "a", MessageKind::User, "read-me", &f.ids, 1)
        .unwrap();
    f.store
        .send(&f.registry, &b, "a", MessageKind::User, "keep-me", &f.ids, 1)
        .unwrap();
    f.store.mark_read(&b, MarkTarget::One(first)).unwrap();

    assert_eq!(f.store.clear(&b).unwrap(), 1);
    let remaining = f.store.inbox(&b, false);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].content, "keep-me");
}

#[test]
fn broadcast_excludes_the_sender() {
    let f = fixture(&["a", "b", "c"]);
    let ids = f
        .store
        .broadcast(&f.registry, "a", "standup", &f.ids, 1)
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert!(f.store.inbox(&name("a"), false).is_empty());
    for agent in ["b", "c"] {
        let inbox = f.store.inbox(&name(agent), false);
        assert_eq!(inbox.len(), 1, "agent {agent}");
        assert_eq!(inbox[0].kind, MessageKind::Broadcast);
        assert_eq!(inbox[0].from, "a");
    }
}

#[test]
fn empty_inbox_is_empty_not_an_error() {
    let f = fixture(&["b"]);
    assert!(f.store.inbox(&name("b"), false).is_empty());
    assert_eq!(f.store.clear(&name("b")).unwrap(), 0);
}
