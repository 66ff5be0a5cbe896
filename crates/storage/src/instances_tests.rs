// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::paths::DataRoot;

fn store(tmp: &tempfile::TempDir) -> InstanceStore {
    let root = DataRoot::new(tmp.path());
    root.ensure_layout().unwrap();
    InstanceStore::new(&root)
}

fn instance(id: &str, started_at_ms: u64) -> WorkflowInstance {
    WorkflowInstance::new(
        InstanceId::new(id),
        "feature".into(),
        "task".into(),
        "/tmp/p".into(),
        false,
        vec!["explore".into()],
        started_at_ms,
    )
}

#[test]
fn save_then_load_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    let mut inst = instance("wf-1", 100);
    inst.record_output("explore", "found things".into());
    store.save(&inst).unwrap();

    let loaded = store.load(&InstanceId::new("wf-1")).unwrap();
    assert_eq!(loaded.workflow, "feature");
    assert_eq!(
        loaded.stage_outputs.get("explore").map(String::as_str),
        Some("found things")
    );
}

#[test]
fn list_is_newest_first_and_skips_output_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    store.save(&instance("wf-old", 100)).unwrap();
    store.save(&instance("wf-new", 200)).unwrap();
    store.output_dir(&InstanceId::new("wf-old")).unwrap();

    let ids: Vec<String> = store.list().into_iter().map(|i| i.id.0).collect();
    assert_eq!(ids, vec!["wf-new", "wf-old"]);
}

#[test]
fn load_unknown_instance_is_none() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    assert!(store.load(&InstanceId::new("ghost")).is_none());
}

#[test]
fn output_dir_is_created_on_demand() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store(&tmp);
    let dir = store.output_dir(&InstanceId::new("wf-1")).unwrap();
    assert!(dir.is_dir());
    assert!(dir.ends_with("wf-1-output"));
}
