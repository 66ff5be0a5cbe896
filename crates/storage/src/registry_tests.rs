// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use daedalos_core::DEFAULT_MAX_SLOTS;
use proptest::prelude::*;

fn open(tmp: &tempfile::TempDir) -> Registry {
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    Registry::open(&root, DEFAULT_MAX_SLOTS).unwrap()
}

fn create(reg: &mut Registry, name: &str) -> AgentRecord {
    reg.create(name, "/tmp/p".into(), "default".into(), None, 1000)
        .unwrap()
}

#[test]
fn create_assigns_lowest_free_slot() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    assert_eq!(create(&mut reg, "a").slot, 1);
    assert_eq!(create(&mut reg, "b").slot, 2);
    reg.delete("a").unwrap();
    assert_eq!(create(&mut reg, "c").slot, 1);
}

#[test]
fn duplicate_name_is_rejected_without_mutation() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    create(&mut reg, "a");
    let err = reg
        .create("a", "/tmp/p".into(), "default".into(), None, 1000)
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName(_)));
    assert_eq!(reg.all().len(), 1);
}

#[test]
fn invalid_name_is_rejected_without_mutation() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    let err = reg
        .create("1bad", "/tmp/p".into(), "default".into(), None, 1000)
        .unwrap_err();
    assert!(matches!(err, RegistryError::Name(_)));
    assert!(reg.is_empty());
}

#[test]
fn slots_are_a_hard_cap() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    for i in 1..=DEFAULT_MAX_SLOTS {
        create(&mut reg, &format!("a{i}"));
    }
    let err = reg
        .create("overflow", "/tmp/p".into(), "default".into(), None, 1000)
        .unwrap_err();
    assert!(matches!(err, RegistryError::NoSlot(n) if n == DEFAULT_MAX_SLOTS));
}

#[test]
fn explicit_slot_must_be_free_and_in_range() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    let rec = reg
        .create("a", "/tmp/p".into(), "default".into(), Some(5), 1000)
        .unwrap();
    assert_eq!(rec.slot, 5);
    for bad in [0, 5, DEFAULT_MAX_SLOTS + 1] {
        let err = reg
            .create("b", "/tmp/p".into(), "default".into(), Some(bad), 1000)
            .unwrap_err();
        assert!(matches!(err, RegistryError::NoSlot(_)), "slot {bad}");
    }
}

#[test]
fn delete_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    create(&mut reg, "a");
    reg.delete("a").unwrap();
    reg.delete("a").unwrap();
    assert!(reg.lookup("a").is_none());
}

#[test]
fn resolve_prefers_slot_then_exact_then_prefix_then_substring() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    create(&mut reg, "worker");
    create(&mut reg, "work");
    create(&mut reg, "w2");

    // numeric → slot
    assert_eq!(reg.resolve("2").unwrap(), "work");
    // exact
    assert_eq!(reg.resolve("work").unwrap(), "work");
    // prefix (first in insertion order)
    assert_eq!(reg.resolve("wor").unwrap(), "worker");
    // substring
    assert_eq!(reg.resolve("orke").unwrap(), "worker");
    // no match
    assert!(reg.resolve("ghost").is_none());
    assert!(reg.resolve("99").is_none());
}

#[test]
fn touch_and_typed_updates_persist() {
    let tmp = tempfile::tempdir().unwrap();
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    {
        let mut reg = Registry::open(&root, DEFAULT_MAX_SLOTS).unwrap();
        create(&mut reg, "a");
        reg.touch("a", 2000).unwrap();
        reg.set_status("a", daedalos_core::AgentStatus::Idle).unwrap();
        reg.set_child_pid("a", 4242).unwrap();
    }
    let reg = Registry::open(&root, DEFAULT_MAX_SLOTS).unwrap();
    let rec = reg.lookup("a").unwrap();
    assert_eq!(rec.last_activity_ms, 2000);
    assert_eq!(rec.status, daedalos_core::AgentStatus::Idle);
    assert_eq!(rec.child_pid, 4242);
}

#[test]
fn updates_on_unknown_agents_fail() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reg = open(&tmp);
    assert!(matches!(
        reg.touch("ghost", 1),
        Err(RegistryError::UnknownAgent(_))
    ));
}

#[test]
fn reload_picks_up_external_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    let mut first = Registry::open(&root, DEFAULT_MAX_SLOTS).unwrap();
    let mut second = Registry::open(&root, DEFAULT_MAX_SLOTS).unwrap();
    create(&mut first, "a");
    assert!(second.lookup("a").is_none());
    second.reload();
    assert!(second.lookup("a").is_some());
}

proptest! {
    // Live agents' slots stay pairwise distinct and within the cap across
    // arbitrary create/delete interleavings.
    #[test]
    fn slot_uniqueness_holds(ops in proptest::collection::vec(0u8..12, 1..40)) {
        let tmp = tempfile::tempdir().unwrap();
        let mut reg = open(&tmp);
        for (i, op) in ops.iter().enumerate() {
            let name = format!("a{}", op);
            if i % 3 == 0 {
                let _ = reg.delete(&name);
            } else {
                let _ = reg.create(&name, "/tmp/p".into(), "default".into(), None, 1);
            }
            let slots: Vec<u32> = reg.all().iter().map(|r| r.slot).collect();
            let mut dedup = slots.clone();
            dedup.sort_unstable();
            dedup.dedup();
            prop_assert_eq!(slots.len(), dedup.len());
            prop_assert!(slots.iter().all(|s| (1..=DEFAULT_MAX_SLOTS).contains(s)));
        }
    }
}
