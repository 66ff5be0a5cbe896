// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine value: adapters plus store handles.

use crate::error::Result;
use daedalos_adapters::{SessionAdapter, TmuxAdapter};
use daedalos_core::{
    AgentName, Clock, IdGen, ProcessProbe, SystemClock, SystemProcessProbe, UuidIdGen,
    DEFAULT_MAX_SLOTS,
};
use daedalos_playbook::Playbook;
use daedalos_storage::{
    ArtifactStore, ClaimStore, DataRoot, HandoffStore, InstanceStore, LockStore, MessageStore,
    Registry, SignalStore, SnapshotStore,
};
use std::time::Duration;

/// Tunables that tests shrink to keep runs fast.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// How many slots the registry hands out (hard cap)
    pub max_slots: u32,
    /// Settle window after spawn before reading the child PID
    pub settle: Duration,
    /// Pause between keystroke groups when driving a session
    pub key_pause: Duration,
    /// Grace window between a graceful interrupt and the forced kill
    pub kill_grace: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_slots: max_slots_from_env(),
            settle: Duration::from_millis(500),
            key_pause: Duration::from_millis(50),
            kill_grace: Duration::from_millis(500),
        }
    }
}

impl EngineOptions {
    /// Zero delays, for tests against fakes.
    pub fn immediate() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
            settle: Duration::ZERO,
            key_pause: Duration::ZERO,
            kill_grace: Duration::ZERO,
        }
    }
}

fn max_slots_from_env() -> u32 {
    std::env::var("DAEDALOS_MAX_SLOTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_SLOTS)
}

/// The orchestration engine.
pub struct Engine<S: SessionAdapter, C: Clock, P: ProcessProbe, G: IdGen> {
    pub(crate) root: DataRoot,
    pub(crate) sessions: S,
    pub(crate) clock: C,
    pub(crate) probe: P,
    pub(crate) id_gen: G,
    pub(crate) opts: EngineOptions,
}

impl Engine<TmuxAdapter, SystemClock, SystemProcessProbe, UuidIdGen> {
    /// The production wiring: tmux sessions, real clock and process table.
    pub fn production(root: DataRoot) -> Result<Self> {
        root.ensure_layout()?;
        Ok(Self {
            root,
            sessions: TmuxAdapter::new(),
            clock: SystemClock,
            probe: SystemProcessProbe,
            id_gen: UuidIdGen,
            opts: EngineOptions::default(),
        })
    }
}

impl<S: SessionAdapter, C: Clock, P: ProcessProbe, G: IdGen> Engine<S, C, P, G> {
    pub fn new(
        root: DataRoot,
        sessions: S,
        clock: C,
        probe: P,
        id_gen: G,
        opts: EngineOptions,
    ) -> Result<Self> {
        root.ensure_layout()?;
        Ok(Self {
            root,
            sessions,
            clock,
            probe,
            id_gen,
            opts,
        })
    }

    pub fn data_root(&self) -> &DataRoot {
        &self.root
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn registry(&self) -> Result<Registry> {
        Ok(Registry::open(&self.root, self.opts.max_slots)?)
    }

    pub fn messages(&self) -> MessageStore {
        MessageStore::new(&self.root)
    }

    pub fn signals(&self) -> SignalStore {
        SignalStore::new(&self.root)
    }

    pub fn locks(&self) -> LockStore<P> {
        LockStore::new(&self.root, self.probe.clone())
    }

    pub fn claims(&self) -> ClaimStore {
        ClaimStore::new(&self.root)
    }

    pub fn handoffs(&self) -> HandoffStore {
        HandoffStore::new(&self.root)
    }

    pub fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(&self.root)
    }

    pub fn snapshots(&self) -> SnapshotStore {
        SnapshotStore::new(&self.root)
    }

    pub fn instances(&self) -> InstanceStore {
        InstanceStore::new(&self.root)
    }

    pub fn id_gen(&self) -> &G {
        &self.id_gen
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn epoch_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// Load the playbook from the data root's document directories.
    pub fn playbook(&self) -> Result<Playbook> {
        Ok(Playbook::load(
            &self.root.templates_dir(),
            &self.root.workflows_dir(),
        )?)
    }

    /// Resolve a user-supplied identifier (slot, name, prefix, substring).
    pub fn resolve(&self, registry: &Registry, identifier: &str) -> Result<AgentName> {
        registry
            .resolve(identifier)
            .ok_or_else(|| crate::error::EngineError::UnknownAgent(identifier.to_string()))
    }
}
