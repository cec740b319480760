use crate::backend::{
    ActionRequest, ActionTarget, FlowBackend, FlowHandle, PublishResult, TaskHandle,
    ValidationResult,
};
use crate::builder::{build_survey_flow, check_plan};
use crate::config::RunConfig;
use crate::error::{BuildError, OrchestratorError, PlanError};
use crate::plan::{ActionSpec, FlowPlan, TaskId};
use ahash::AHashMap;
use std::collections::VecDeque;
use tracing::{debug, error, info, warn};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Dry run: the flow validated cleanly and was left unpublished.
    Validated(ValidationResult),
    Published(PublishResult),
}

/// Builds a survey plan and replays it against a `FlowBackend`, strictly in sequence:
/// create, configure, add tasks, add actions, validate, publish.
///
/// Validation errors and warnings both block publishing. Nothing is rolled back on
/// failure because an unpublished flow only exists on the backend side.
pub struct Orchestrator<B: FlowBackend> {
    backend: B,
    config: RunConfig,
}

impl<B: FlowBackend> Orchestrator<B> {
    pub fn new(backend: B, config: RunConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Builds the plan from the run's survey config and replays it.
    pub async fn run(&self) -> Result<RunOutcome, OrchestratorError> {
        debug!(session = ?self.config.session, dry_run = self.config.dry_run, "run configuration");
        let plan = build_survey_flow(&self.config.survey)?;
        info!(
            flow = %plan.name,
            tasks = plan.tasks.len(),
            "survey plan built"
        );
        self.replay(&plan).await
    }

    /// Replays an already built plan, e.g. one loaded from an artifact.
    pub async fn replay(&self, plan: &FlowPlan) -> Result<RunOutcome, OrchestratorError> {
        check_plan(plan).map_err(BuildError::Plan)?;

        let flow = self
            .backend
            .create_flow(&plan.name, &plan.description, &self.config.settings.language)
            .await?;
        self.backend
            .apply_settings(flow, &self.config.settings)
            .await?;

        // All tasks first, so jumps can point at tasks that come later in the plan.
        let mut handles: AHashMap<TaskId, TaskHandle> = AHashMap::new();
        for task in &plan.tasks {
            let handle = self
                .backend
                .add_task(flow, &task.label, task.is_startup_task)
                .await?;
            handles.insert(task.id, handle);
        }
        for task in &plan.tasks {
            let target = ActionTarget::Task(handles[&task.id]);
            self.replay_actions(flow, target, task.id, &task.actions, &handles)
                .await?;
        }

        let validation = self.backend.validate(flow).await?;
        for message in &validation.messages {
            debug!(severity = ?message.severity, "{}", message.text);
        }
        if validation.has_errors() {
            error!(
                flow = %plan.name,
                errors = validation.error_count(),
                "there is at least one validation error in the created flow; not publishing"
            );
            return Err(OrchestratorError::ValidationFailed(validation));
        }
        if validation.has_warnings() {
            warn!(
                flow = %plan.name,
                warnings = validation.warning_count(),
                "there is at least one validation warning in the created flow; not publishing"
            );
            return Err(OrchestratorError::ValidationFailed(validation));
        }
        info!(flow = %plan.name, "the flow has no validation errors or warnings");

        if self.config.dry_run {
            info!(flow = %plan.name, "dry run, skipping publish");
            return Ok(RunOutcome::Validated(validation));
        }

        warn!(
            flow = %plan.name,
            backend = self.backend.name(),
            "publishing deletes any existing flow with this name; the session needs the architect:flow:delete permission"
        );
        let published = self.backend.publish(flow).await?;
        info!(
            flow = %plan.name,
            location = %self.config.session.location,
            url = %published.url,
            "flow is now published"
        );
        Ok(RunOutcome::Published(published))
    }

    /// Appends `actions` to `target`. Decision outputs are queued and filled once the
    /// decision itself exists on the backend.
    async fn replay_actions(
        &self,
        flow: FlowHandle,
        target: ActionTarget,
        task: TaskId,
        actions: &[ActionSpec],
        handles: &AHashMap<TaskId, TaskHandle>,
    ) -> Result<(), OrchestratorError> {
        let mut pending: VecDeque<(ActionTarget, &[ActionSpec])> = VecDeque::new();
        pending.push_back((target, actions));

        while let Some((target, sequence)) = pending.pop_front() {
            for action in sequence {
                let request = to_request(task, action, handles)?;
                let handle = self.backend.add_action(flow, target, request).await?;
                if let ActionSpec::Decision(decision) = action {
                    pending.push_back((ActionTarget::DecisionYes(handle), decision.yes.as_slice()));
                    pending.push_back((ActionTarget::DecisionNo(handle), decision.no.as_slice()));
                }
            }
        }
        Ok(())
    }
}

fn to_request(
    task: TaskId,
    action: &ActionSpec,
    handles: &AHashMap<TaskId, TaskHandle>,
) -> Result<ActionRequest, OrchestratorError> {
    let request = match action {
        ActionSpec::UpdateData { label, statements } => ActionRequest::UpdateData {
            label: label.clone(),
            statements: statements.clone(),
        },
        ActionSpec::Decision(decision) => ActionRequest::Decision {
            label: decision.label.clone(),
            expression: decision.expression.clone(),
        },
        ActionSpec::GetParticipantData { label, attributes } => {
            ActionRequest::GetParticipantData {
                label: label.clone(),
                attributes: attributes.clone(),
            }
        }
        ActionSpec::CallDataAction { label, action_id } => ActionRequest::CallDataAction {
            label: label.clone(),
            action_id: action_id.clone(),
        },
        ActionSpec::JumpToTask { label, target } => {
            let handle = handles.get(target).copied().ok_or_else(|| {
                BuildError::Plan(vec![PlanError::DanglingJump {
                    task,
                    target: *target,
                }])
            })?;
            ActionRequest::JumpToTask {
                label: label.clone(),
                target: handle,
            }
        }
        ActionSpec::Disconnect { label } => ActionRequest::Disconnect {
            label: label.clone(),
        },
    };
    Ok(request)
}
