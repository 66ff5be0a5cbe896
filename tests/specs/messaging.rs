// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO inbox ordering and broadcast behavior.

use super::harness::{engine, project};
use daedalos_core::MessageKind;
use daedalos_engine::SpawnOptions;

#[tokio::test]
async fn fifo_inbox_across_senders() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    let project = project(&tmp);
    engine
        .spawn("b", &project, SpawnOptions::default())
        .await
        .unwrap();

    let registry = engine.registry().unwrap();
    let b = registry.resolve("b").unwrap();
    let messages = engine.messages();
    for (from, content) in [("a", "one"), ("a", "two"), ("c", "three")] {
        messages
            .send(
                &registry,
                &b,
                from,
                MessageKind::User,
                content,
                engine.id_gen(),
                engine.epoch_ms(),
            )
            .unwrap();
    }

    let contents: Vec<String> = messages
        .inbox(&b, false)
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn broadcast_reaches_everyone_but_the_sender() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    let project = project(&tmp);
    for agent in ["x", "y", "z"] {
        engine
            .spawn(agent, &project, SpawnOptions::default())
            .await
            .unwrap();
    }

    let registry = engine.registry().unwrap();
    engine
        .messages()
        .broadcast(&registry, "x", "sync up", engine.id_gen(), engine.epoch_ms())
        .unwrap();

    let x = registry.resolve("x").unwrap();
    assert!(engine.messages().inbox(&x, false).is_empty());
    for agent in ["y", "z"] {
        let inbox = engine
            .messages()
            .inbox(&registry.resolve(agent).unwrap(), false);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].from, "x");
    }
}
