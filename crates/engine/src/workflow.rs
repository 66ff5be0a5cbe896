// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workflow engine: staged multi-agent plans.
//!
//! Each stage spawns a dedicated agent whose prompt carries the task, any
//! `pass_to_next` outputs from earlier stages, and completion instructions
//! telling it where to write findings and how to self-signal. Sequential
//! runs chain stages through the driver's waits; parallel runs spawn all
//! stages and block once on `wait_all`.

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::hooks::{self, HookContext, HookEvent};
use crate::lifecycle::SpawnOptions;
use daedalos_adapters::SessionAdapter;
use daedalos_core::{
    AgentName, Clock, FailureStrategy, IdGen, InstanceId, InstanceStatus, ProcessProbe,
    SignalStatus, WorkflowInstance,
};
use daedalos_playbook::{interpolate, StageDef, WorkflowDef};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Pluggable "is this failure transient?" predicate for retry gating.
pub type TransientPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Per-run workflow tuning.
#[derive(Clone)]
pub struct WorkflowOptions {
    /// What to do when a stage signals failure
    pub strategy: FailureStrategy,
    /// Per-stage wait in sequential runs
    pub stage_timeout: Duration,
    /// Single wait-all budget in parallel runs
    pub parallel_timeout: Duration,
    pub poll_interval: Duration,
    /// Backoff between retry attempts, scaled by attempt number
    pub retry_backoff: Duration,
    pub max_retries: u32,
    /// Gates `Retry`: only failures this predicate accepts are retried
    pub transient: TransientPredicate,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            strategy: FailureStrategy::default(),
            stage_timeout: Duration::from_secs(600),
            parallel_timeout: Duration::from_secs(900),
            poll_interval: Duration::from_millis(250),
            retry_backoff: Duration::from_secs(5),
            max_retries: 2,
            transient: Arc::new(default_transient),
        }
    }
}

/// Substring heuristics for transient-sounding failures.
pub fn default_transient(data: &str) -> bool {
    const MARKERS: &[&str] = &["timeout", "timed out", "network", "rate limit", "overloaded", "connection"];
    let lower = data.to_lowercase();
    MARKERS.iter().any(|m| lower.contains(m))
}

/// What one stage attempt produced.
enum StageOutcome {
    Success(Option<String>),
    Failed(String),
    Timeout,
}

impl<S: SessionAdapter, C: Clock, P: ProcessProbe, G: IdGen> Engine<S, C, P, G> {
    /// Create and persist a new workflow instance. The definition is
    /// validated at load; no side effects happen on a malformed document.
    pub fn workflow_start(
        &self,
        workflow_name: &str,
        task: &str,
        project: &Path,
    ) -> Result<WorkflowInstance> {
        let playbook = self.playbook()?;
        let def = playbook.workflow(workflow_name)?;
        let id = InstanceId::new(format!("wf-{}", self.id_gen.next()));
        let instance = WorkflowInstance::new(
            id,
            def.name.clone(),
            task.to_string(),
            project.to_path_buf(),
            def.parallel,
            def.stage_names(),
            self.clock.epoch_ms(),
        );
        self.instances().save(&instance)?;
        tracing::info!(instance = %instance.id, workflow = %instance.workflow, "workflow started");
        Ok(instance)
    }

    /// Drive an instance to a terminal status. Blocks the calling process
    /// for the duration of the run.
    pub async fn workflow_drive(
        &self,
        id: &InstanceId,
        opts: &WorkflowOptions,
    ) -> Result<InstanceStatus> {
        let mut instance = self
            .instances()
            .load(id)
            .ok_or_else(|| EngineError::UnknownInstance(id.to_string()))?;
        let playbook = self.playbook()?;
        let def = playbook.workflow(&instance.workflow)?.clone();

        let status = if instance.parallel {
            self.drive_parallel(&mut instance, &def, opts).await?
        } else {
            self.drive_sequential(&mut instance, &def, opts).await?
        };

        instance.finish(status, self.clock.epoch_ms());
        self.instances().save(&instance)?;
        let project_str = instance.project.display().to_string();
        hooks::run_hooks(
            &self.root,
            HookContext {
                event: HookEvent::OnWorkflowComplete,
                agent: instance.id.as_str(),
                data: status.as_str(),
                project: Some(project_str.as_str()),
                template: None,
                status: Some(status.as_str()),
            },
        )
        .await;
        tracing::info!(instance = %instance.id, status = %status, "workflow finished");
        Ok(status)
    }

    /// One instance by exact id or prefix, or all instances.
    pub fn workflow_status(&self, identifier: Option<&str>) -> Result<Vec<WorkflowInstance>> {
        match identifier {
            None => Ok(self.instances().list()),
            Some(identifier) => Ok(vec![self.find_instance(identifier)?]),
        }
    }

    /// Kill every stage agent and mark the instance stopped.
    pub async fn workflow_stop(&self, identifier: &str, force: bool) -> Result<WorkflowInstance> {
        let mut instance = self.find_instance(identifier)?;
        for agent in instance.agents_by_stage.values() {
            if let Err(e) = self.kill(agent.as_str(), force).await {
                tracing::debug!(agent = %agent, error = %e, "stage agent already gone");
            }
        }
        instance.finish(InstanceStatus::Stopped, self.clock.epoch_ms());
        self.instances().save(&instance)?;
        Ok(instance)
    }

    fn find_instance(&self, identifier: &str) -> Result<WorkflowInstance> {
        let instances = self.instances().list();
        instances
            .iter()
            .find(|i| i.id == *identifier)
            .or_else(|| {
                instances
                    .iter()
                    .find(|i| i.id.as_str().starts_with(identifier))
            })
            .cloned()
            .ok_or_else(|| EngineError::UnknownInstance(identifier.to_string()))
    }

    async fn drive_sequential(
        &self,
        instance: &mut WorkflowInstance,
        def: &WorkflowDef,
        opts: &WorkflowOptions,
    ) -> Result<InstanceStatus> {
        let output_dir = self.instances().output_dir(&instance.id)?;
        let mut vars: HashMap<String, String> =
            HashMap::from([("task".to_string(), instance.task.clone())]);
        let mut all_real = true;

        for (index, stage) in def.stages.iter().enumerate() {
            instance.current_stage = index;
            self.instances().save(instance)?;
            let output_path = output_dir.join(format!("{}.md", stage.name));

            let mut attempt = 0u32;
            let outcome = loop {
                let agent = self
                    .spawn_stage(instance, stage, &vars, &output_path)
                    .await?;
                instance.set_stage_agent(&stage.name, agent.clone());
                self.instances().save(instance)?;

                if !self
                    .wait_signal(&agent, opts.stage_timeout, opts.poll_interval)
                    .await
                {
                    break StageOutcome::Timeout;
                }
                let Some(signal) = self.signals().get(&agent) else {
                    break StageOutcome::Timeout;
                };
                match signal.status {
                    SignalStatus::Success => break StageOutcome::Success(signal.data),
                    status => {
                        let data = signal.data.clone().unwrap_or_default();
                        let retryable = opts.strategy == FailureStrategy::Retry
                            && status == SignalStatus::Failure
                            && attempt < opts.max_retries
                            && (opts.transient)(&data);
                        if !retryable {
                            break StageOutcome::Failed(data);
                        }
                        attempt += 1;
                        tracing::warn!(
                            instance = %instance.id,
                            stage = %stage.name,
                            attempt,
                            "stage failed with transient error, retrying"
                        );
                        self.signals().clear(&agent)?;
                        let _ = self.kill(agent.as_str(), true).await;
                        tokio::time::sleep(opts.retry_backoff * attempt).await;
                    }
                }
            };

            // The stage is over either way; free its slot
            if let Some(agent) = instance.agents_by_stage.get(&stage.name).cloned() {
                let _ = self.kill(agent.as_str(), true).await;
            }

            match outcome {
                StageOutcome::Success(data) => {
                    let output = stage_output(data, &output_path)
                        .unwrap_or_else(|| "[no output recorded]".to_string());
                    if let Some(ref key) = stage.pass_to_next {
                        vars.insert(key.clone(), output.clone());
                    }
                    instance.record_output(&stage.name, output);
                }
                StageOutcome::Timeout => {
                    tracing::warn!(instance = %instance.id, stage = %stage.name, "stage timed out");
                    instance
                        .record_output(&stage.name, "[timed out: no output]".to_string());
                    all_real = false;
                }
                StageOutcome::Failed(data) => match opts.strategy {
                    FailureStrategy::Skip => {
                        instance.record_output(&stage.name, format!("[skipped: {data}]"));
                        all_real = false;
                    }
                    FailureStrategy::Fallback => {
                        instance.record_output(&stage.name, "[unavailable]".to_string());
                        all_real = false;
                    }
                    FailureStrategy::Abort | FailureStrategy::Retry => {
                        instance.record_output(&stage.name, format!("[failed: {data}]"));
                        self.instances().save(instance)?;
                        return Ok(InstanceStatus::Failed);
                    }
                },
            }
            self.instances().save(instance)?;
        }

        Ok(if all_real {
            InstanceStatus::Completed
        } else {
            InstanceStatus::Partial
        })
    }

    async fn drive_parallel(
        &self,
        instance: &mut WorkflowInstance,
        def: &WorkflowDef,
        opts: &WorkflowOptions,
    ) -> Result<InstanceStatus> {
        let output_dir = self.instances().output_dir(&instance.id)?;
        let vars: HashMap<String, String> =
            HashMap::from([("task".to_string(), instance.task.clone())]);

        let mut agents = Vec::with_capacity(def.stages.len());
        for stage in &def.stages {
            let output_path = output_dir.join(format!("{}.md", stage.name));
            let agent = self
                .spawn_stage(instance, stage, &vars, &output_path)
                .await?;
            instance.set_stage_agent(&stage.name, agent.clone());
            // Persist as we go so `stop` can find every stage agent
            self.instances().save(instance)?;
            agents.push(agent);
        }

        let all_signaled = self
            .wait_all(&agents, opts.parallel_timeout, opts.poll_interval)
            .await;

        let mut aggregate = format!(
            "# Workflow: {}\n\nTask: {}\n\n",
            instance.workflow, instance.task
        );
        let mut any_failure = false;
        for stage in &def.stages {
            let output_path = output_dir.join(format!("{}.md", stage.name));
            let agent = instance.agents_by_stage.get(&stage.name);
            let signal = agent.and_then(|a| self.signals().get(a));
            let section = match signal {
                Some(signal) => {
                    if signal.status != SignalStatus::Success {
                        any_failure = true;
                    }
                    let payload = stage_output(signal.data.clone(), &output_path)
                        .unwrap_or_else(|| "[no output recorded]".to_string());
                    match signal.status {
                        SignalStatus::Success => payload,
                        status => format!("[{status}] {payload}"),
                    }
                }
                None => "[incomplete: no completion signal before timeout]".to_string(),
            };
            aggregate.push_str(&format!("## Stage: {}\n\n{}\n\n", stage.name, section));
            instance.record_output(&stage.name, section);
        }
        daedalos_storage::fs::write_atomic(&output_dir.join("aggregate.md"), aggregate.as_bytes())?;

        for agent in &agents {
            let _ = self.kill(agent.as_str(), true).await;
        }

        Ok(if !all_signaled {
            InstanceStatus::Partial
        } else if any_failure {
            InstanceStatus::Failed
        } else {
            InstanceStatus::Completed
        })
    }

    async fn spawn_stage(
        &self,
        instance: &WorkflowInstance,
        stage: &StageDef,
        vars: &HashMap<String, String>,
        output_path: &Path,
    ) -> Result<AgentName> {
        let agent = stage_agent_name(&instance.id, &stage.name)?;
        // A signal left over from an earlier attempt must not satisfy the wait
        self.signals().clear(&agent)?;
        let prompt = format!(
            "{}{}",
            interpolate(&stage.prompt, vars),
            completion_instructions(&agent, output_path)
        );
        self.spawn(
            agent.as_str(),
            &instance.project,
            SpawnOptions {
                template: stage.template.clone(),
                prompt: Some(prompt),
                ..SpawnOptions::default()
            },
        )
        .await?;
        Ok(agent)
    }
}

/// Resolve a stage's output: signal data first (reading it as a file when it
/// points at one), then the stage's output file.
fn stage_output(data: Option<String>, output_path: &Path) -> Option<String> {
    if let Some(data) = data {
        let trimmed = data.trim();
        if !trimmed.is_empty() {
            let as_path = Path::new(trimmed);
            if as_path.is_file() {
                if let Ok(content) = std::fs::read_to_string(as_path) {
                    return Some(content.trim_end().to_string());
                }
            }
            return Some(data);
        }
    }
    std::fs::read_to_string(output_path)
        .ok()
        .map(|s| s.trim_end().to_string())
}

/// Deterministic, name-rule-safe agent name for a stage.
fn stage_agent_name(instance: &InstanceId, stage: &str) -> Result<AgentName> {
    let tail: String = instance
        .as_str()
        .trim_start_matches("wf-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(6)
        .collect();
    let stage_part: String = stage
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let mut name = format!("wf-{tail}-{stage_part}");
    name.truncate(daedalos_core::MAX_NAME_LEN);
    let name = name.trim_end_matches('-').to_string();
    Ok(AgentName::parse(name).map_err(daedalos_storage::RegistryError::from)?)
}

/// Instructions appended to every stage prompt.
fn completion_instructions(agent: &AgentName, output_path: &Path) -> String {
    format!(
        "\n\n---\nWhen you finish this stage, write your findings to {path} and then run:\n\n  daedalos signal complete {agent} --status success --data \"{path}\"\n\nIf you cannot finish, use --status failure (or --status blocked when you need a human) with an explanation as --data.",
        path = output_path.display(),
        agent = agent,
    )
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
