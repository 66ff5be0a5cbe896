// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawn/kill round trips and snapshot/restore.

use super::harness::{engine, project};
use daedalos_engine::{SnapshotTarget, SpawnOptions};

#[tokio::test]
async fn spawn_kill_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    let project = project(&tmp);

    let record = engine
        .spawn("w1", &project, SpawnOptions::default())
        .await
        .unwrap();
    assert_eq!(record.slot, 1);

    // Prefix resolution finds it
    let registry = engine.registry().unwrap();
    assert_eq!(registry.resolve("w").unwrap(), "w1");
    drop(registry);

    engine.kill("w1", false).await.unwrap();
    assert!(engine.registry().unwrap().lookup("w1").is_none());

    // Slot 1 is reusable
    let next = engine
        .spawn("w2", &project, SpawnOptions::default())
        .await
        .unwrap();
    assert_eq!(next.slot, 1);
}

#[tokio::test]
async fn snapshot_restore_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    let project = project(&tmp);

    for agent in ["w1", "w2"] {
        engine
            .spawn(agent, &project, SpawnOptions::default())
            .await
            .unwrap();
        engine
            .sessions()
            .set_scrollback(&format!("agent-{agent}"), format!("{agent} scrollback\n"));
    }

    let snapshot = engine
        .snapshot(SnapshotTarget::All, Some("snap1".into()))
        .await
        .unwrap();

    engine.kill("w1", true).await.unwrap();
    engine.kill("w2", true).await.unwrap();

    let restored = engine.restore(snapshot.as_str(), None, false).await.unwrap();
    assert_eq!(restored.len(), 2);

    let registry = engine.registry().unwrap();
    for agent in ["w1", "w2"] {
        let record = registry.lookup(agent).unwrap();
        assert_eq!(record.template, "default");
        assert_eq!(record.project, project);
    }

    // Captured scrollback is inspectable in the snapshot directory
    let stored = engine
        .data_root()
        .snapshot_agent_dir(&snapshot, &daedalos_core::AgentName::parse("w1").unwrap())
        .join("scrollback.txt");
    assert_eq!(
        std::fs::read_to_string(stored).unwrap(),
        "w1 scrollback\n"
    );
}
