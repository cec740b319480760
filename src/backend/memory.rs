//! In-memory flow backend for rehearsal runs and tests.

use super::{
    ActionHandle, ActionRequest, ActionTarget, FlowBackend, FlowHandle, PublishResult,
    TaskHandle, ValidationResult,
};
use crate::config::{FlowSettings, Location, SessionConfig};
use crate::error::BackendError;
use ahash::AHashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

struct ActionRecord {
    request: ActionRequest,
    yes: Vec<usize>,
    no: Vec<usize>,
}

struct TaskRecord {
    label: String,
    is_startup: bool,
    actions: Vec<usize>,
}

struct FlowRecord {
    name: String,
    description: String,
    language: String,
    settings: Option<FlowSettings>,
    tasks: Vec<TaskRecord>,
    /// Arena for every action of the flow; tasks and decision outputs hold indices into it.
    actions: Vec<ActionRecord>,
}

#[derive(Default)]
struct State {
    next_flow_id: u64,
    flows: AHashMap<u64, FlowRecord>,
    /// Published flow name -> flow id.
    published: AHashMap<String, u64>,
}

/// A read-only copy of a flow held by the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub name: String,
    pub description: String,
    pub language: String,
    pub settings: Option<FlowSettings>,
    pub tasks: Vec<TaskSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub label: String,
    pub is_startup: bool,
    pub actions: Vec<ActionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSnapshot {
    pub request: ActionRequest,
    pub yes: Vec<ActionSnapshot>,
    pub no: Vec<ActionSnapshot>,
}

/// Keeps flows in process memory. Task handles index the flow's task list, action
/// handles index its action arena.
pub struct InMemoryBackend {
    location: Location,
    state: RwLock<State>,
}

impl InMemoryBackend {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            state: RwLock::new(State::default()),
        }
    }

    /// Opens a session. Blank credentials are rejected the way the real service would.
    pub fn connect(session: &SessionConfig) -> Result<Self, BackendError> {
        session
            .validate()
            .map_err(|e| BackendError::Authentication(e.to_string()))?;
        info!(
            location = %session.location,
            grant = ?session.grant,
            "session started"
        );
        Ok(Self::new(session.location))
    }

    /// Marks `name` as already published, so the next publish under that name replaces it.
    pub fn with_published(mut self, name: &str) -> Self {
        let state = self.state.get_mut();
        let id = state.next_flow_id;
        state.next_flow_id += 1;
        state.published.insert(name.to_string(), id);
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub async fn published_names(&self) -> Vec<String> {
        let guard = self.state.read().await;
        let mut names: Vec<String> = guard.published.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn snapshot(&self, flow: FlowHandle) -> Option<FlowSnapshot> {
        let guard = self.state.read().await;
        let record = guard.flows.get(&flow.0)?;
        Some(FlowSnapshot {
            name: record.name.clone(),
            description: record.description.clone(),
            language: record.language.clone(),
            settings: record.settings.clone(),
            tasks: record
                .tasks
                .iter()
                .map(|t| TaskSnapshot {
                    label: t.label.clone(),
                    is_startup: t.is_startup,
                    actions: snapshot_actions(record, &t.actions),
                })
                .collect(),
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!(
            "memory://{}/flows/{}",
            self.location,
            name.replace(' ', "%20")
        )
    }
}

fn snapshot_actions(record: &FlowRecord, indices: &[usize]) -> Vec<ActionSnapshot> {
    indices
        .iter()
        .map(|&i| {
            let action = &record.actions[i];
            ActionSnapshot {
                request: action.request.clone(),
                yes: snapshot_actions(record, &action.yes),
                no: snapshot_actions(record, &action.no),
            }
        })
        .collect()
}

fn flow_mut(state: &mut State, flow: FlowHandle) -> Result<&mut FlowRecord, BackendError> {
    state
        .flows
        .get_mut(&flow.0)
        .ok_or(BackendError::UnknownFlow(flow.0))
}

fn validate_record(record: &FlowRecord) -> ValidationResult {
    let mut result = ValidationResult::default();

    match record.tasks.iter().filter(|t| t.is_startup).count() {
        0 => result.error("The flow has no startup task"),
        1 => {}
        n => result.error(format!("The flow has {} startup tasks", n)),
    }

    if record
        .settings
        .as_ref()
        .is_some_and(|s| s.initial_audio.trim().is_empty())
    {
        result.warning("The flow has no initial greeting audio");
    }

    for task in &record.tasks {
        match task.actions.last() {
            None => result.error(format!("Task '{}' has no actions", task.label)),
            Some(&last) if !record.actions[last].request.is_terminal() => result.error(format!(
                "Task '{}' does not end with a terminating action",
                task.label
            )),
            Some(_) => {}
        }
        validate_actions(record, &task.label, &task.actions, &mut result);
    }

    result
}

fn validate_actions(
    record: &FlowRecord,
    task_label: &str,
    indices: &[usize],
    result: &mut ValidationResult,
) {
    for &i in indices {
        let action = &record.actions[i];
        match &action.request {
            ActionRequest::CallDataAction { label, action_id } if action_id.trim().is_empty() => {
                result.error(format!(
                    "Action '{}' in task '{}' has no data action selected",
                    label, task_label
                ));
            }
            ActionRequest::Decision { label, expression } => {
                if expression.trim().is_empty() {
                    result.error(format!(
                        "Decision '{}' in task '{}' has no condition",
                        label, task_label
                    ));
                }
                if action.yes.is_empty() && action.no.is_empty() {
                    result.warning(format!(
                        "Decision '{}' in task '{}' has no actions on either output",
                        label, task_label
                    ));
                }
            }
            ActionRequest::UpdateData { label, statements } if statements.is_empty() => {
                result.warning(format!(
                    "Update Data '{}' in task '{}' has no statements",
                    label, task_label
                ));
            }
            ActionRequest::GetParticipantData { label, attributes } if attributes.is_empty() => {
                result.warning(format!(
                    "Get Participant Data '{}' in task '{}' reads no attributes",
                    label, task_label
                ));
            }
            ActionRequest::JumpToTask { label, target } if target.0 as usize >= record.tasks.len() => {
                result.error(format!(
                    "Jump '{}' in task '{}' targets a task that does not exist",
                    label, task_label
                ));
            }
            _ => {}
        }
        validate_actions(record, task_label, &action.yes, result);
        validate_actions(record, task_label, &action.no, result);
    }
}

#[async_trait]
impl FlowBackend for InMemoryBackend {
    async fn create_flow(
        &self,
        name: &str,
        description: &str,
        language: &str,
    ) -> Result<FlowHandle, BackendError> {
        if name.trim().is_empty() {
            return Err(BackendError::Rejected("flow name must not be empty".to_string()));
        }
        let mut guard = self.state.write().await;
        let id = guard.next_flow_id;
        guard.next_flow_id += 1;
        guard.flows.insert(
            id,
            FlowRecord {
                name: name.to_string(),
                description: description.to_string(),
                language: language.to_string(),
                settings: None,
                tasks: Vec::new(),
                actions: Vec::new(),
            },
        );
        debug!(flow = name, id, "flow created");
        Ok(FlowHandle(id))
    }

    async fn apply_settings(
        &self,
        flow: FlowHandle,
        settings: &FlowSettings,
    ) -> Result<(), BackendError> {
        let mut guard = self.state.write().await;
        flow_mut(&mut guard, flow)?.settings = Some(settings.clone());
        Ok(())
    }

    async fn add_task(
        &self,
        flow: FlowHandle,
        label: &str,
        is_startup: bool,
    ) -> Result<TaskHandle, BackendError> {
        let mut guard = self.state.write().await;
        let record = flow_mut(&mut guard, flow)?;
        record.tasks.push(TaskRecord {
            label: label.to_string(),
            is_startup,
            actions: Vec::new(),
        });
        debug!(task = label, is_startup, "task added");
        Ok(TaskHandle((record.tasks.len() - 1) as u64))
    }

    async fn add_action(
        &self,
        flow: FlowHandle,
        target: ActionTarget,
        action: ActionRequest,
    ) -> Result<ActionHandle, BackendError> {
        let mut guard = self.state.write().await;
        let record = flow_mut(&mut guard, flow)?;

        if let ActionRequest::JumpToTask { target: task, .. } = &action {
            if task.0 as usize >= record.tasks.len() {
                return Err(BackendError::UnknownTask(task.0));
            }
        }

        let index = record.actions.len();
        match target {
            ActionTarget::Task(task) => {
                let task_record = record
                    .tasks
                    .get_mut(task.0 as usize)
                    .ok_or(BackendError::UnknownTask(task.0))?;
                task_record.actions.push(index);
            }
            ActionTarget::DecisionYes(parent) | ActionTarget::DecisionNo(parent) => {
                let parent_record = record
                    .actions
                    .get_mut(parent.0 as usize)
                    .ok_or(BackendError::UnknownAction(parent.0))?;
                if !matches!(parent_record.request, ActionRequest::Decision { .. }) {
                    return Err(BackendError::InvalidTarget(format!(
                        "action '{}' is not a decision",
                        parent_record.request.label()
                    )));
                }
                if matches!(target, ActionTarget::DecisionYes(_)) {
                    parent_record.yes.push(index);
                } else {
                    parent_record.no.push(index);
                }
            }
        }

        debug!(action = action.label(), "action added");
        record.actions.push(ActionRecord {
            request: action,
            yes: Vec::new(),
            no: Vec::new(),
        });
        Ok(ActionHandle(index as u64))
    }

    async fn validate(&self, flow: FlowHandle) -> Result<ValidationResult, BackendError> {
        let guard = self.state.read().await;
        let record = guard
            .flows
            .get(&flow.0)
            .ok_or(BackendError::UnknownFlow(flow.0))?;
        Ok(validate_record(record))
    }

    async fn publish(&self, flow: FlowHandle) -> Result<PublishResult, BackendError> {
        let mut guard = self.state.write().await;
        let record = guard
            .flows
            .get(&flow.0)
            .ok_or(BackendError::UnknownFlow(flow.0))?;

        let validation = validate_record(record);
        if validation.has_errors() {
            return Err(BackendError::Rejected(format!(
                "flow '{}' has {} validation error(s)",
                record.name,
                validation.error_count()
            )));
        }

        let name = record.name.clone();
        let replaced_existing = guard.published.insert(name.clone(), flow.0).is_some();
        if replaced_existing {
            warn!(flow = %name, "deleted the previously published flow with the same name");
        }
        info!(flow = %name, "flow published");

        Ok(PublishResult {
            url: self.url_for(&name),
            replaced_existing,
        })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
