//! Prelude module for convenient imports
//!
//! Re-exports the types needed to plan a survey flow and replay it against a backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use survey_flow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let survey = SurveyConfig::from_file("path/to/survey.json")?;
//! let plan = build_survey_flow(&survey)?;
//! plan.save("survey.bin")?;
//! # Ok(())
//! # }
//! ```

// Planning
pub use crate::builder::{Planner, PlannerBuilder, build_decision_demo, build_survey_flow, check_plan};
pub use crate::config::{FlowSettings, GrantType, Location, RunConfig, SessionConfig, SurveyConfig};
pub use crate::plan::{
    ActionSpec, AttributePair, DataType, DecisionSpec, FlowPlan, PlanVisualizer, TaskId,
    TaskKind, TaskNode, UpdateStatement,
};

// Replay
pub use crate::backend::{
    ActionRequest, ActionTarget, FlowBackend, InMemoryBackend, PublishResult, ValidationResult,
};
pub use crate::orchestrator::{Orchestrator, RunOutcome};

// Error types
pub use crate::error::{
    ArtifactError, BackendError, BuildError, ConfigError, FailureCause, OrchestratorError,
    PlanError, StatementError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
