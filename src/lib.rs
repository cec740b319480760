//! # Survey Flow - IVR Survey Flow Builder
//!
//! **survey-flow** derives the call flow of a post-call IVR survey from a handful of
//! parameters and replays it against a flow backend that validates and publishes it.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the survey**: Fill a `SurveyConfig` (flow name, description, question
//!     count, close-the-loop flag, login data action id), in code or from JSON.
//! 2.  **Plan**: `Planner::builder(config).build().plan()` turns the config into a
//!     `FlowPlan`, a pure in-memory description of tasks and their ordered actions.
//!     Building a plan performs no I/O.
//! 3.  **Replay**: An `Orchestrator` walks the plan against a `FlowBackend`: it creates
//!     the flow, adds every task and action, validates, and publishes only when the
//!     backend reports neither errors nor warnings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use survey_flow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let survey = SurveyConfig {
//!         flow_name: "Survey".to_string(),
//!         flow_description: "Post-call survey".to_string(),
//!         number_of_questions: 3,
//!         has_close_the_loop: true,
//!         loop_count: 3,
//!         data_action_id: "custom_-_login".to_string(),
//!     };
//!
//!     // Planning alone is pure.
//!     let plan = Planner::builder(survey.clone()).build().plan()?;
//!     println!("{}", PlanVisualizer::render(&plan));
//!
//!     // Replaying needs a backend and an async runtime.
//!     let config = RunConfig { survey, ..RunConfig::default() };
//!     let backend = InMemoryBackend::new(Location::default());
//!     let orchestrator = Orchestrator::new(backend, config);
//!     let outcome = tokio_test::block_on(orchestrator.run())?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod prelude;
