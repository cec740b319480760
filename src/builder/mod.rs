use crate::config::SurveyConfig;
use crate::error::BuildError;
use crate::plan::{ActionSpec, FlowPlan, TaskId, TaskKind, TaskNode};

#[cfg(feature = "debug-tools")]
use {crate::plan::PlanVisualizer, std::fs};

mod check;
mod demo;
pub mod statements;

pub use check::check_plan;
pub use demo::build_decision_demo;
use statements::*;

pub const STARTUP_TASK_LABEL: &str = "StartUpTask";
pub const LOGIN_TASK_LABEL: &str = "Login";
pub const CREATE_INTERACTION_TASK_LABEL: &str = "Create Interaction";
pub const CLOSE_THE_LOOP_TASK_LABEL: &str = "Close The Loop";
pub const END_OF_TASK_DISCONNECT: &str = "end of task disconnect";

/// Builds the survey flow plan for `config` with the default startup tables.
pub fn build_survey_flow(config: &SurveyConfig) -> Result<FlowPlan, BuildError> {
    Planner::builder(config.clone()).build().plan()
}

/// Derives a `FlowPlan` from a `SurveyConfig`. Pure: no I/O, no shared state.
pub struct Planner {
    config: SurveyConfig,
    startup_blocks: &'static [UpdateBlock],
    participant_attributes: &'static [AttributeDef],
}

pub struct PlannerBuilder {
    config: SurveyConfig,
    startup_blocks: &'static [UpdateBlock],
    participant_attributes: &'static [AttributeDef],
}

impl PlannerBuilder {
    pub fn new(config: SurveyConfig) -> Self {
        Self {
            config,
            startup_blocks: STARTUP_BLOCKS,
            participant_attributes: CUSTOMER_ATTRIBUTES,
        }
    }
    pub fn with_startup_blocks(mut self, blocks: &'static [UpdateBlock]) -> Self {
        self.startup_blocks = blocks;
        self
    }
    pub fn with_participant_attributes(mut self, attributes: &'static [AttributeDef]) -> Self {
        self.participant_attributes = attributes;
        self
    }
    pub fn build(self) -> Planner {
        Planner {
            config: self.config,
            startup_blocks: self.startup_blocks,
            participant_attributes: self.participant_attributes,
        }
    }
}

impl Planner {
    pub fn builder(config: SurveyConfig) -> PlannerBuilder {
        PlannerBuilder::new(config)
    }

    /// Builds the plan. Tasks are created in a fixed order:
    /// StartUp, Login, Create Interaction, `Question 1..N`, then Close The Loop if enabled.
    ///
    /// Invalid input fails before any task is constructed.
    pub fn plan(&self) -> Result<FlowPlan, BuildError> {
        self.config.validate()?;
        let question_count = self.config.question_count()?;
        validate_statement_table(self.startup_blocks, self.participant_attributes)
            .map_err(BuildError::Statements)?;

        let mut tasks = Vec::new();
        let mut next_id = 0u32;
        let mut alloc = |label: String, kind: TaskKind| {
            let task = TaskNode::new(TaskId(next_id), label, kind);
            next_id += 1;
            task
        };

        let mut startup = alloc(STARTUP_TASK_LABEL.to_string(), TaskKind::StartUp);
        startup.is_startup_task = true;
        let mut login = alloc(LOGIN_TASK_LABEL.to_string(), TaskKind::Login);
        let mut create_interaction = alloc(
            CREATE_INTERACTION_TASK_LABEL.to_string(),
            TaskKind::CreateInteraction,
        );
        let questions = (1..=question_count)
            .map(|i| alloc(format!("Question {}", i), TaskKind::Question))
            .collect::<Vec<_>>();
        let close_the_loop = self
            .config
            .has_close_the_loop
            .then(|| alloc(CLOSE_THE_LOOP_TASK_LABEL.to_string(), TaskKind::CloseTheLoop));

        // StartUp: variable setup, customer data, then the single entry edge into Login.
        startup.actions = emit_update_blocks(self.startup_blocks);
        startup.actions.push(emit_participant_data(
            "GetParticipantData CustomerData",
            self.participant_attributes,
        ));
        startup.actions.push(ActionSpec::JumpToTask {
            label: format!("Go to {}", LOGIN_TASK_LABEL),
            target: login.id,
        });

        // Data-action inputs and outputs are not bound.
        login.actions.push(ActionSpec::CallDataAction {
            label: "Login Data Action".to_string(),
            action_id: self.config.data_action_id.clone(),
        });
        login.actions.push(disconnect());

        create_interaction.actions.push(disconnect());

        let startup_task_id = startup.id;
        tasks.push(startup);
        tasks.push(login);
        tasks.push(create_interaction);
        // Question disconnects carry the zero-based question index.
        for (index, mut question) in questions.into_iter().enumerate() {
            question.actions.push(ActionSpec::Disconnect {
                label: format!("{} {}", END_OF_TASK_DISCONNECT, index),
            });
            tasks.push(question);
        }
        if let Some(mut task) = close_the_loop {
            task.actions.push(disconnect());
            tasks.push(task);
        }

        let plan = FlowPlan {
            name: self.config.flow_name.clone(),
            description: self.config.flow_description.clone(),
            tasks,
            startup_task_id,
        };
        check_plan(&plan).map_err(BuildError::Plan)?;

        #[cfg(feature = "debug-tools")]
        self.write_debug_file(&plan);

        Ok(plan)
    }

    #[cfg(feature = "debug-tools")]
    fn write_debug_file(&self, plan: &FlowPlan) {
        let sanitized = plan
            .name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect::<String>();
        let path = format!("tmp/plan_{}.txt", sanitized);
        let result = fs::create_dir_all("tmp")
            .and_then(|_| fs::write(&path, PlanVisualizer::render(plan)));
        if let Err(e) = result {
            tracing::warn!(path = %path, error = %e, "could not write plan debug file");
        }
    }
}

fn disconnect() -> ActionSpec {
    ActionSpec::Disconnect {
        label: END_OF_TASK_DISCONNECT.to_string(),
    }
}
