// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test harness: an engine wired to fakes.

use daedalos_adapters::FakeSessionAdapter;
use daedalos_core::{FakeClock, FakeProcessProbe, SequentialIdGen};
use daedalos_engine::{Engine, EngineOptions};
use daedalos_storage::DataRoot;
use std::path::PathBuf;
use std::sync::Arc;

pub type TestEngine = Engine<FakeSessionAdapter, FakeClock, FakeProcessProbe, SequentialIdGen>;

pub fn engine(tmp: &tempfile::TempDir) -> Arc<TestEngine> {
    let probe = FakeProcessProbe::new();
    probe.set_alive(std::process::id());
    Arc::new(
        Engine::new(
            DataRoot::new(tmp.path().join("data")),
            FakeSessionAdapter::new(),
            FakeClock::new(),
            probe,
            SequentialIdGen::new("t"),
            EngineOptions::immediate(),
        )
        .unwrap(),
    )
}

pub fn project(tmp: &tempfile::TempDir) -> PathBuf {
    let dir = tmp.path().join("project");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_workflow(engine: &TestEngine, name: &str, doc: &str) {
    let dir = engine.data_root().workflows_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{name}.toml")), doc).unwrap();
}
