// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock contention, stale-lock recovery, and wait semantics.

use super::harness::engine;
use daedalos_core::{AgentName, SignalStatus};
use std::sync::Arc;
use std::time::Duration;

const POLL: Duration = Duration::from_millis(10);

#[tokio::test]
async fn lock_contention_single_winner() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);

    // Winner takes the lock; loser with zero timeout fails fast
    assert!(engine
        .acquire_lock("db-schema", "alpha", Duration::ZERO, POLL)
        .await
        .unwrap());
    assert!(!engine
        .acquire_lock("db-schema", "beta", Duration::ZERO, POLL)
        .await
        .unwrap());

    // With a budget, the loser wins once the winner releases
    let releaser = Arc::clone(&engine);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        releaser.locks().release("db-schema", "alpha").unwrap();
    });
    assert!(engine
        .acquire_lock("db-schema", "beta", Duration::from_secs(5), POLL)
        .await
        .unwrap());
    handle.await.unwrap();
}

#[tokio::test]
async fn stale_lock_recovery_after_holder_death() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    let locks = engine.locks();

    // A holder from another (now dead) process: its PID is unknown to the
    // fake probe, so it reads as dead.
    assert!(locks.try_acquire("db-schema", "casualty", 99_999, 1).unwrap());
    assert!(engine
        .acquire_lock("db-schema", "survivor", Duration::ZERO, POLL)
        .await
        .unwrap());
    assert_eq!(locks.info("db-schema").unwrap().owner, "survivor");
}

#[tokio::test]
async fn wait_reflects_completion_during_the_interval() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    let agent = AgentName::parse("waiter").unwrap();

    // No signal: times out
    assert!(
        !engine
            .wait_signal(&agent, Duration::from_millis(40), POLL)
            .await
    );

    // Signal lands mid-wait: true
    let signaler = Arc::clone(&engine);
    let signaled = agent.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        signaler
            .complete(&signaled, SignalStatus::Success, Some("done".into()))
            .await
            .unwrap();
    });
    assert!(
        engine
            .wait_signal(&agent, Duration::from_secs(5), POLL)
            .await
    );
    handle.await.unwrap();

    // Overwrite: the latest signal wins
    engine
        .complete(&agent, SignalStatus::Failure, Some("second".into()))
        .await
        .unwrap();
    let signal = engine.signals().get(&agent).unwrap();
    assert_eq!(signal.status, SignalStatus::Failure);
    assert_eq!(signal.data.as_deref(), Some("second"));
}
