// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use daedalos_core::test_support::name;

fn store(tmp: &tempfile::TempDir) -> SignalStore {
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    SignalStore::new(&root)
}

#[test]
fn check_is_false_before_any_signal() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    assert!(!store.check(&name("w1")));
    assert!(store.get(&name("w1")).is_none());
}

#[test]
fn complete_then_get_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    let w1 = name("w1");
    store
        .complete(&w1, SignalStatus::Success, Some("done".into()), 5)
        .unwrap();
    assert!(store.check(&w1));
    let sig = store.get(&w1).unwrap();
    assert_eq!(sig.status, SignalStatus::Success);
    assert_eq!(sig.data.as_deref(), Some("done"));
    assert_eq!(sig.signaled_at_ms, 5);
}

#[test]
fn later_signal_overwrites_earlier() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    let w1 = name("w1");
    store
        .complete(&w1, SignalStatus::Failure, Some("first".into()), 1)
        .unwrap();
    store
        .complete(&w1, SignalStatus::Success, Some("second".into()), 2)
        .unwrap();
    let sig = store.get(&w1).unwrap();
    assert_eq!(sig.status, SignalStatus::Success);
    assert_eq!(sig.data.as_deref(), Some("second"));
}

#[test]
fn clear_removes_and_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    let w1 = name("w1");
    store.complete(&w1, SignalStatus::Blocked, None, 1).unwrap();
    store.clear(&w1).unwrap();
    assert!(!store.check(&w1));
    store.clear(&w1).unwrap();
}

#[test]
fn signals_are_per_agent() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    store
        .complete(&name("w1"), SignalStatus::Success, None, 1)
        .unwrap();
    assert!(!store.check(&name("w2")));
}
