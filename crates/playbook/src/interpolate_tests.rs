// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn substitutes_known_tokens() {
    let out = interpolate("Work on {task} in {area}", &vars(&[("task", "auth"), ("area", "api")]));
    assert_eq!(out, "Work on auth in api");
}

#[test]
fn unknown_tokens_are_left_literal() {
    let out = interpolate("keep {this} as-is", &vars(&[("task", "auth")]));
    assert_eq!(out, "keep {this} as-is");
}

#[test]
fn repeated_tokens_all_substitute() {
    let out = interpolate("{task} and {task}", &vars(&[("task", "x")]));
    assert_eq!(out, "x and x");
}

#[test]
fn braces_without_identifier_are_untouched() {
    let out = interpolate("json: {\"k\": 1} and {1bad}", &vars(&[]));
    assert_eq!(out, "json: {\"k\": 1} and {1bad}");
}

#[test]
fn empty_template_is_empty() {
    assert_eq!(interpolate("", &vars(&[("task", "x")])), "");
}

proptest! {
    #[test]
    fn interpolate_never_panics(template in "\\PC*", key in "[a-z]{1,8}", value in "\\PC{0,20}") {
        let mut map = HashMap::new();
        map.insert(key, value);
        let _ = interpolate(&template, &map);
    }

    #[test]
    fn token_free_templates_pass_through(template in "[^{}]*") {
        let map = HashMap::new();
        prop_assert_eq!(interpolate(&template, &map), template);
    }
}
