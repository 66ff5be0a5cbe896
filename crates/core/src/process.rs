// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process liveness probing.
//!
//! Stale-lock recovery needs to know whether a holder PID still refers to a
//! live process. The probe is a trait so tests can fabricate dead holders
//! without spawning anything.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Answers "is this PID a live process?"
pub trait ProcessProbe: Clone + Send + Sync {
    fn alive(&self, pid: u32) -> bool;
}

/// Probes the real process table via `ps -p`.
#[derive(Clone, Default)]
pub struct SystemProcessProbe;

impl ProcessProbe for SystemProcessProbe {
    fn alive(&self, pid: u32) -> bool {
        if pid == 0 {
            return false;
        }
        let pid_arg = pid.to_string();
        std::process::Command::new("ps")
            .args(["-p", pid_arg.as_str()])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// Test probe with an explicit set of live PIDs.
#[derive(Clone, Default)]
pub struct FakeProcessProbe {
    live: Arc<Mutex<HashSet<u32>>>,
}

impl FakeProcessProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_alive(&self, pid: u32) {
        self.live.lock().insert(pid);
    }

    pub fn set_dead(&self, pid: u32) {
        self.live.lock().remove(&pid);
    }
}

impl ProcessProbe for FakeProcessProbe {
    fn alive(&self, pid: u32) -> bool {
        self.live.lock().contains(&pid)
    }
}
