// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential chaining and parallel aggregation end to end.

use super::harness::{engine, project, write_workflow, TestEngine};
use daedalos_core::{InstanceStatus, SignalStatus};
use daedalos_engine::WorkflowOptions;
use std::sync::Arc;
use std::time::Duration;

fn fast_opts() -> WorkflowOptions {
    WorkflowOptions {
        stage_timeout: Duration::from_secs(5),
        parallel_timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
        ..WorkflowOptions::default()
    }
}

/// Stand-in for stage agents: whenever a workflow agent is registered and
/// unsignaled, write `from-<stage>` to its stage output file and signal
/// success with that path as data.
fn mock_stage_agents(engine: Arc<TestEngine>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let Ok(registry) = engine.registry() else {
                continue;
            };
            let Some(instance) = engine.instances().list().into_iter().next() else {
                continue;
            };
            let Ok(output_dir) = engine.instances().output_dir(&instance.id) else {
                continue;
            };
            for record in registry.all() {
                let name = record.name.as_str();
                if !name.starts_with("wf-") || engine.signals().check(&record.name) {
                    continue;
                }
                let stage = name.rsplit('-').next().unwrap_or("stage").to_string();
                let output_path = output_dir.join(format!("{stage}.md"));
                std::fs::write(&output_path, format!("from-{stage}")).unwrap();
                let _ = engine
                    .complete(
                        &record.name,
                        SignalStatus::Success,
                        Some(output_path.display().to_string()),
                    )
                    .await;
            }
        }
    })
}

#[tokio::test]
async fn sequential_feature_workflow_completes_with_chained_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    write_workflow(
        &engine,
        "feature",
        r#"
name = "feature"
description = "explore, plan, implement, review"

[[stages]]
name = "explore"
prompt = "Explore for {task}"
pass_to_next = "exploration_summary"

[[stages]]
name = "plan"
prompt = "Plan {task} from {exploration_summary}"
pass_to_next = "implementation_plan"

[[stages]]
name = "implement"
prompt = "Implement {implementation_plan}"
pass_to_next = "implementation_summary"

[[stages]]
name = "review"
prompt = "Review {implementation_summary}"
"#,
    );

    let instance = engine
        .workflow_start("feature", "add retries", &project(&tmp))
        .unwrap();
    let mocks = mock_stage_agents(Arc::clone(&engine));
    let status = engine
        .workflow_drive(&instance.id, &fast_opts())
        .await
        .unwrap();
    mocks.abort();

    assert_eq!(status, InstanceStatus::Completed);

    let finished = engine.instances().load(&instance.id).unwrap();
    for stage in ["explore", "plan", "implement", "review"] {
        assert_eq!(
            finished.stage_outputs.get(stage).map(String::as_str),
            Some(format!("from-{stage}").as_str()),
            "stage {stage}"
        );
    }

    // The review agent's prompt carried the implement stage's output
    let review_agent = finished.agents_by_stage.get("review").unwrap();
    let sent = engine.sessions().sent(&review_agent.session_name());
    let prompt = sent.iter().find(|s| s.contains("Review")).unwrap();
    assert!(prompt.contains("from-implement"), "prompt was: {prompt}");
}

#[tokio::test]
async fn parallel_review_workflow_aggregates_payloads() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(&tmp);
    write_workflow(
        &engine,
        "review",
        r#"
name = "review"
parallel = true

[[stages]]
name = "correctness"
prompt = "Check correctness of {task}"

[[stages]]
name = "security"
prompt = "Check security of {task}"

[[stages]]
name = "style"
prompt = "Check style of {task}"
"#,
    );

    let instance = engine
        .workflow_start("review", "the new diff", &project(&tmp))
        .unwrap();

    // Stage agents signal success with short payloads as data
    let completer = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let Ok(registry) = engine.registry() else { continue };
                for record in registry.all() {
                    let name = record.name.as_str();
                    if !name.starts_with("wf-") || engine.signals().check(&record.name) {
                        continue;
                    }
                    let payload = if name.ends_with("correctness") {
                        "correct"
                    } else if name.ends_with("security") {
                        "secure"
                    } else {
                        "styled"
                    };
                    let _ = engine
                        .complete(&record.name, SignalStatus::Success, Some(payload.into()))
                        .await;
                }
            }
        })
    };

    let status = engine
        .workflow_drive(&instance.id, &fast_opts())
        .await
        .unwrap();
    completer.abort();

    assert_eq!(status, InstanceStatus::Completed);

    let aggregate = std::fs::read_to_string(
        engine
            .data_root()
            .instance_output_dir(&instance.id)
            .join("aggregate.md"),
    )
    .unwrap();

    // Headings in declaration order with the respective payloads
    let sections: Vec<usize> = [
        "## Stage: correctness",
        "## Stage: security",
        "## Stage: style",
    ]
    .iter()
    .map(|h| aggregate.find(h).unwrap())
    .collect();
    assert!(sections[0] < sections[1] && sections[1] < sections[2]);
    for payload in ["correct", "secure", "styled"] {
        assert!(aggregate.contains(payload), "missing {payload}");
    }
}
