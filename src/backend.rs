//! The contract between the orchestrator and the service that owns flows.
//!
//! The backend creates flows, accepts tasks and actions, validates the result and
//! publishes it. Expression semantics, validation rules and publishing all live on the
//! backend side; this crate only replays plans against it.

use crate::config::FlowSettings;
use crate::error::BackendError;
use crate::plan::{AttributePair, UpdateStatement};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod memory;

pub use memory::{ActionSnapshot, FlowSnapshot, InMemoryBackend, TaskSnapshot};

/// Opaque handle to a flow created on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle(pub u64);

/// Where a new action is appended: the root sequence of a task, or one output of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Task(TaskHandle),
    DecisionYes(ActionHandle),
    DecisionNo(ActionHandle),
}

/// A single action as the backend receives it. Jumps reference backend task handles and
/// decisions arrive without their branches, which are appended through `ActionTarget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    UpdateData {
        label: String,
        statements: Vec<UpdateStatement>,
    },
    Decision {
        label: String,
        expression: String,
    },
    GetParticipantData {
        label: String,
        attributes: Vec<AttributePair>,
    },
    CallDataAction {
        label: String,
        action_id: String,
    },
    JumpToTask {
        label: String,
        target: TaskHandle,
    },
    Disconnect {
        label: String,
    },
}

impl ActionRequest {
    pub fn label(&self) -> &str {
        match self {
            ActionRequest::UpdateData { label, .. }
            | ActionRequest::Decision { label, .. }
            | ActionRequest::GetParticipantData { label, .. }
            | ActionRequest::CallDataAction { label, .. }
            | ActionRequest::JumpToTask { label, .. }
            | ActionRequest::Disconnect { label } => label,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionRequest::Disconnect { .. } | ActionRequest::JumpToTask { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub text: String,
}

/// Outcome of a backend-side validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub messages: Vec<ValidationMessage>,
}

impl ValidationResult {
    pub fn error(&mut self, text: impl Into<String>) {
        self.messages.push(ValidationMessage {
            severity: Severity::Error,
            text: text.into(),
        });
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.messages.push(ValidationMessage {
            severity: Severity::Warning,
            text: text.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }

    fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub url: String,
    /// A published flow with the same name existed and was deleted first.
    pub replaced_existing: bool,
}

/// A service that can build, validate and publish flows.
///
/// Publishing deletes any existing flow with the same name before the new one goes live,
/// so the session behind an implementation needs permission to delete flows.
#[async_trait]
pub trait FlowBackend: Send + Sync {
    /// Creates an empty, unpublished flow.
    async fn create_flow(
        &self,
        name: &str,
        description: &str,
        language: &str,
    ) -> Result<FlowHandle, BackendError>;

    /// Applies greeting audio and speech-recognition settings.
    async fn apply_settings(
        &self,
        flow: FlowHandle,
        settings: &FlowSettings,
    ) -> Result<(), BackendError>;

    async fn add_task(
        &self,
        flow: FlowHandle,
        label: &str,
        is_startup: bool,
    ) -> Result<TaskHandle, BackendError>;

    async fn add_action(
        &self,
        flow: FlowHandle,
        target: ActionTarget,
        action: ActionRequest,
    ) -> Result<ActionHandle, BackendError>;

    async fn validate(&self, flow: FlowHandle) -> Result<ValidationResult, BackendError>;

    async fn publish(&self, flow: FlowHandle) -> Result<PublishResult, BackendError>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}
