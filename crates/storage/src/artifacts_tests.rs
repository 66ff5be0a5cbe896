// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::paths::DataRoot;
use daedalos_core::test_support::name;
use daedalos_core::SequentialIdGen;

struct Fixture {
    tmp: tempfile::TempDir,
    registry: Registry,
    messages: MessageStore,
    artifacts: ArtifactStore,
    ids: SequentialIdGen,
}

fn fixture(agents: &[&str]) -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let root = DataRoot::new(tmp.path().join("data"));
    root.ensure_layout().unwrap();
    let mut registry = Registry::open(&root, daedalos_core::DEFAULT_MAX_SLOTS).unwrap();
    for agent in agents {
        registry
            .create(agent, "/tmp/p".into(), "default".into(), None, 1000)
            .unwrap();
    }
    Fixture {
        messages: MessageStore::new(&root),
        artifacts: ArtifactStore::new(&root),
        registry,
        ids: SequentialIdGen::new("a"),
        tmp,
    }
}

fn source_file(f: &Fixture, name: &str, content: &str) -> std::path::PathBuf {
    let path = f.tmp.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn publish_copies_content_and_writes_meta() {
    let f = fixture(&["a", "b"]);
    let src = source_file(&f, "notes.md", "findings");
    let published = f
        .artifacts
        .publish(&f.registry, &f.messages, &name("a"), &src, &[], None, &f.ids, 5)
        .unwrap();
    assert_eq!(published, "notes");

    let (meta, content) = f.artifacts.get("notes").unwrap();
    assert_eq!(meta.shared_by, "a");
    assert!(meta.recipients.is_empty());
    assert_eq!(std::fs::read_to_string(content).unwrap(), "findings");
}

#[test]
fn publish_notifies_everyone_but_the_sharer() {
    let f = fixture(&["a", "b", "c"]);
    let src = source_file(&f, "notes.md", "x");
    f.artifacts
        .publish(&f.registry, &f.messages, &name("a"), &src, &[], None, &f.ids, 5)
        .unwrap();
    assert!(f.messages.inbox(&name("a"), false).is_empty());
    for agent in ["b", "c"] {
        let inbox = f.messages.inbox(&name(agent), false);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, daedalos_core::MessageKind::SharedArtifact);
    }
}

#[test]
fn explicit_recipients_limit_notification() {
    let f = fixture(&["a", "b", "c"]);
    let src = source_file(&f, "notes.md", "x");
    f.artifacts
        .publish(
            &f.registry,
            &f.messages,
            &name("a"),
            &src,
            &[name("c")],
            None,
            &f.ids,
            5,
        )
        .unwrap();
    assert!(f.messages.inbox(&name("b"), false).is_empty());
    assert_eq!(f.messages.inbox(&name("c"), false).len(), 1);
    let (meta, _) = f.artifacts.get("notes").unwrap();
    assert_eq!(meta.recipients.len(), 1);
}

#[test]
fn colliding_names_get_numeric_suffixes() {
    let f = fixture(&["a", "b"]);
    let src = source_file(&f, "notes.md", "x");
    let first = f
        .artifacts
        .publish(&f.registry, &f.messages, &name("a"), &src, &[], None, &f.ids, 5)
        .unwrap();
    let second = f
        .artifacts
        .publish(&f.registry, &f.messages, &name("a"), &src, &[], None, &f.ids, 6)
        .unwrap();
    assert_eq!(first, "notes");
    assert_eq!(second, "notes-2");
    assert_eq!(f.artifacts.artifacts().len(), 2);
}

#[test]
fn requested_name_wins() {
    let f = fixture(&["a", "b"]);
    let src = source_file(&f, "notes.md", "x");
    let published = f
        .artifacts
        .publish(
            &f.registry,
            &f.messages,
            &name("a"),
            &src,
            &[],
            Some("design-doc"),
            &f.ids,
            5,
        )
        .unwrap();
    assert_eq!(published, "design-doc");
}

#[test]
fn missing_source_file_fails() {
    let f = fixture(&["a"]);
    assert!(matches!(
        f.artifacts.publish(
            &f.registry,
            &f.messages,
            &name("a"),
            std::path::Path::new("/nonexistent/file.md"),
            &[],
            None,
            &f.ids,
            5,
        ),
        Err(ArtifactError::SourceMissing(_))
    ));
}

#[test]
fn get_unknown_artifact_is_none() {
    let f = fixture(&["a"]);
    assert!(f.artifacts.get("ghost").is_none());
}
