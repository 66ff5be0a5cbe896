// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_template_runs_claude_and_signals() {
    let def = TemplateDef::default();
    assert_eq!(def.name, "default");
    assert_eq!(def.build_command(), "claude");
    assert_eq!(def.on_complete, OnComplete::Signal);
}

#[test]
fn build_command_appends_tool_flags() {
    let def = TemplateDef {
        base_args: vec!["claude".into(), "--model".into(), "opus".into()],
        allowed_tools: vec!["Read".into(), "Bash".into()],
        denied_tools: vec!["WebSearch".into()],
        ..TemplateDef::default()
    };
    assert_eq!(
        def.build_command(),
        "claude --model opus --allowedTools Read,Bash --disallowedTools WebSearch"
    );
}

#[test]
fn effective_prompt_layers_system_prefix_and_task() {
    let def = TemplateDef {
        system_prompt: Some("You are a reviewer.".into()),
        prompt_prefix: Some("Review carefully: ".into()),
        ..TemplateDef::default()
    };
    assert_eq!(
        def.effective_prompt("check the diff"),
        "You are a reviewer.\n\nReview carefully: check the diff"
    );
}

#[test]
fn effective_prompt_without_extras_is_the_task() {
    let def = TemplateDef::default();
    assert_eq!(def.effective_prompt("just do it"), "just do it");
}

#[test]
fn empty_system_prompt_adds_no_separator() {
    let def = TemplateDef {
        system_prompt: Some(String::new()),
        ..TemplateDef::default()
    };
    assert_eq!(def.effective_prompt("task"), "task");
}
