// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory lock metadata.

use serde::{Deserialize, Serialize};

/// Metadata written by the holder of an advisory lock.
///
/// The lock itself is an atomically created sentinel directory; this record
/// travels beside it so contenders can see who holds it and whether the
/// holder process is still alive (stale-lock recovery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub name: String,
    pub owner: String,
    pub holder_pid: u32,
    pub acquired_at_ms: u64,
}
