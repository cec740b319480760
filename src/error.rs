use crate::backend::ValidationResult;
use crate::plan::TaskId;
use thiserror::Error;

/// Errors raised while checking a `SurveyConfig` or session settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Flow name must not be empty")]
    EmptyFlowName,

    #[error("Flow description must not be empty")]
    EmptyDescription,

    #[error("Number of questions must be zero or greater, got {0}")]
    NegativeQuestionCount(i64),

    #[error("Number of questions {0} is out of range")]
    TooManyQuestions(i64),

    #[error("Loop count must be zero or greater, got {0}")]
    NegativeLoopCount(i64),

    #[error("Login data action id must not be empty")]
    EmptyDataActionId,

    #[error("Missing session credential: {0}")]
    MissingCredentials(&'static str),

    #[error("Unknown location '{0}'")]
    UnknownLocation(String),

    #[error("Could not read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse survey config JSON: {0}")]
    Parse(String),
}

/// Problems found in a static update-data statement table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("An update block has an empty label")]
    EmptyLabel,

    #[error("Block '{block}' assigns to '{variable}', which is not a Flow or Task variable")]
    InvalidVariable { block: String, variable: String },

    #[error("Block '{block}' has an empty expression for '{variable}'")]
    EmptyExpression { block: String, variable: String },

    #[error("Block '{block}' assigns '{variable}' more than once")]
    DuplicateVariable { block: String, variable: String },

    #[error("Participant attribute '{attribute}' is written to invalid variable '{variable}'")]
    InvalidAttributeTarget { attribute: String, variable: String },
}

/// Structural violations in a `FlowPlan`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("No task is flagged as the startup task")]
    NoStartupTask,

    #[error("More than one task is flagged as the startup task: {0:?}")]
    MultipleStartupTasks(Vec<TaskId>),

    #[error("Startup reference {0} does not point at the flagged StartUp task")]
    StartupMismatch(TaskId),

    #[error("Task id {0} is used more than once")]
    DuplicateTaskId(TaskId),

    #[error("Task '{label}' ({id}) has no actions")]
    EmptyTask { id: TaskId, label: String },

    #[error("Task '{label}' ({id}) does not end in a Disconnect or JumpToTask action")]
    OpenEnded { id: TaskId, label: String },

    #[error("Task {task} jumps to {target}, which is not part of the plan")]
    DanglingJump { task: TaskId, target: TaskId },
}

/// Errors that can occur while building a `FlowPlan`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Startup statement table is invalid: {}", join_messages(.0))]
    Statements(Vec<StatementError>),

    #[error("Generated plan is inconsistent: {}", join_messages(.0))]
    Plan(Vec<PlanError>),
}

/// Errors reported by a `FlowBackend` implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Flow handle {0} is not known to the backend")]
    UnknownFlow(u64),

    #[error("Task handle {0} is not known to the backend")]
    UnknownTask(u64),

    #[error("Action handle {0} is not known to the backend")]
    UnknownAction(u64),

    #[error("Invalid action target: {0}")]
    InvalidTarget(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Errors raised when saving or loading a plan artifact.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("{0}")]
    Generic(String),
}

/// Everything that can stop a build-and-publish run.
#[derive(Error, Debug, Clone)]
pub enum OrchestratorError {
    #[error("Configuration error: {0}")]
    Build(#[from] BuildError),

    #[error("Backend communication failed: {0}")]
    Backend(#[from] BackendError),

    #[error(
        "Validation blocked publish: {} error(s), {} warning(s)",
        .0.error_count(),
        .0.warning_count()
    )]
    ValidationFailed(ValidationResult),
}

/// The broad category of a failed run, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Configuration,
    Backend,
    Validation,
}

impl OrchestratorError {
    pub fn cause(&self) -> FailureCause {
        match self {
            OrchestratorError::Build(_) => FailureCause::Configuration,
            OrchestratorError::Backend(_) => FailureCause::Backend,
            OrchestratorError::ValidationFailed(_) => FailureCause::Validation,
        }
    }
}

impl From<ConfigError> for OrchestratorError {
    fn from(err: ConfigError) -> Self {
        OrchestratorError::Build(BuildError::Config(err))
    }
}

fn join_messages<E: std::fmt::Display>(errors: &[E]) -> String {
    itertools::join(errors, "; ")
}
