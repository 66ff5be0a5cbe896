// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! daedalos-core: Shared types for the Daedalos orchestration engine

pub mod agent;
pub mod artifact;
pub mod claim;
pub mod clock;
pub mod handoff;
pub mod id;
pub mod lock;
pub mod message;
pub mod process;
pub mod signal;
pub mod snapshot;
pub mod time_fmt;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{AgentName, AgentRecord, AgentStatus, NameError, DEFAULT_MAX_SLOTS, MAX_NAME_LEN};
pub use artifact::ArtifactMeta;
pub use claim::{Claim, ClaimStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use handoff::{Handoff, HandoffId, HandoffStatus};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use lock::LockInfo;
pub use message::{Message, MessageId, MessageKind, MessageState};
pub use process::{FakeProcessProbe, ProcessProbe, SystemProcessProbe};
pub use signal::{CompletionSignal, SignalStatus};
pub use snapshot::{SnapshotId, SnapshotMeta};
pub use time_fmt::format_elapsed_ms;
pub use workflow::{FailureStrategy, InstanceId, InstanceStatus, WorkflowInstance};
