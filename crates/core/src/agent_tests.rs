// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    simple = { "worker" },
    single_letter = { "a" },
    with_digits = { "w1" },
    with_dash = { "explore-agent" },
    with_underscore = { "code_review" },
    mixed_case = { "Reviewer2" },
)]
fn valid_names_parse(name: &str) {
    let parsed = AgentName::parse(name).unwrap();
    assert_eq!(parsed.as_str(), name);
}

#[parameterized(
    empty = { "" },
    leading_digit = { "1worker" },
    leading_dash = { "-worker" },
    space = { "my agent" },
    dot = { "a.b" },
    slash = { "a/b" },
    unicode = { "wörker" },
)]
fn invalid_names_are_rejected(name: &str) {
    assert!(matches!(
        AgentName::parse(name),
        Err(NameError::Invalid(_))
    ));
}

#[test]
fn name_at_max_length_is_accepted() {
    let name = "a".repeat(MAX_NAME_LEN);
    assert!(AgentName::parse(&name).is_ok());
}

#[test]
fn name_over_max_length_is_too_long() {
    let name = "a".repeat(MAX_NAME_LEN + 1);
    assert_eq!(
        AgentName::parse(&name),
        Err(NameError::TooLong(MAX_NAME_LEN + 1))
    );
}

#[test]
fn session_name_has_agent_prefix() {
    let name = AgentName::parse("w1").unwrap();
    assert_eq!(name.session_name(), "agent-w1");
}

#[test]
fn deserialization_validates() {
    let ok: Result<AgentName, _> = serde_json::from_str("\"w1\"");
    assert!(ok.is_ok());
    let bad: Result<AgentName, _> = serde_json::from_str("\"1w\"");
    assert!(bad.is_err());
}

#[test]
fn record_starts_in_starting_status() {
    let name = AgentName::parse("w1").unwrap();
    let rec = AgentRecord::new(name, 1, "/tmp/x".into(), "default".into(), 42);
    assert_eq!(rec.status, AgentStatus::Starting);
    assert_eq!(rec.session, "agent-w1");
    assert_eq!(rec.child_pid, 0);
    assert_eq!(rec.created_at_ms, 42);
    assert_eq!(rec.last_activity_ms, 42);
}

#[test]
fn touch_updates_last_activity_only() {
    let name = AgentName::parse("w1").unwrap();
    let mut rec = AgentRecord::new(name, 1, "/tmp/x".into(), "default".into(), 42);
    rec.touch(99);
    assert_eq!(rec.last_activity_ms, 99);
    assert_eq!(rec.created_at_ms, 42);
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&AgentStatus::Thinking).unwrap(),
        "\"thinking\""
    );
    assert_eq!(AgentStatus::Dead.as_str(), "dead");
    assert!(!AgentStatus::Dead.is_live());
    assert!(AgentStatus::Paused.is_live());
}

proptest! {
    #[test]
    fn parse_never_panics(s in "\\PC*") {
        let _ = AgentName::parse(s.as_str());
    }

    #[test]
    fn accepted_names_match_the_grammar(s in "[A-Za-z][A-Za-z0-9_-]{0,31}") {
        prop_assert!(AgentName::parse(s.as_str()).is_ok());
    }

    #[test]
    fn parse_roundtrips_accepted_input(s in "[A-Za-z][A-Za-z0-9_-]{0,31}") {
        let name = AgentName::parse(s.as_str()).unwrap();
        prop_assert_eq!(name.as_str(), s.as_str());
    }
}
