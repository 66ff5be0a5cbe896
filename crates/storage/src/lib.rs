// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! daedalos-storage: All inter-process state under the data root.
//!
//! Every record is one small JSON file (JSONL for message queues); writes
//! are write-temp-then-rename, locks use atomic directory creation, and
//! readers tolerate absent or torn records by returning neutral values.
//! Nothing here blocks: polling waits live in the engine.

pub mod artifacts;
pub mod claims;
pub mod fs;
pub mod handoffs;
pub mod instances;
pub mod locks;
pub mod messages;
pub mod paths;
pub mod registry;
pub mod signals;
pub mod snapshots;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use claims::{ClaimError, ClaimStore};
pub use handoffs::{HandoffError, HandoffStore};
pub use instances::InstanceStore;
pub use locks::{LockError, LockStore};
pub use messages::{MarkTarget, MessageError, MessageStore};
pub use paths::DataRoot;
pub use registry::{Registry, RegistryError};
pub use signals::SignalStore;
pub use snapshots::SnapshotStore;
