//! Common test utilities: survey fixtures and a scripted flow backend.
use async_trait::async_trait;
use std::sync::Mutex;
use survey_flow::backend::{
    ActionHandle, ActionRequest, ActionTarget, FlowBackend, FlowHandle, PublishResult,
    TaskHandle, ValidationResult,
};
use survey_flow::config::{FlowSettings, SurveyConfig};
use survey_flow::error::BackendError;
use survey_flow::plan::{ActionSpec, DecisionSpec, FlowPlan, TaskId, TaskKind, TaskNode};

/// `{flowName:"Survey", flowDescription:"d", numberOfQuestions:3, hasCloseTheLoop:true, loopCount:3, dataActionId:"abc"}`
#[allow(dead_code)]
pub fn scenario_config() -> SurveyConfig {
    SurveyConfig {
        flow_name: "Survey".to_string(),
        flow_description: "d".to_string(),
        number_of_questions: 3,
        has_close_the_loop: true,
        loop_count: 3,
        data_action_id: "abc".to_string(),
    }
}

#[allow(dead_code)]
pub fn config_with_questions(n: i64) -> SurveyConfig {
    SurveyConfig {
        number_of_questions: n,
        ..scenario_config()
    }
}

#[allow(dead_code)]
pub fn disconnect(label: &str) -> ActionSpec {
    ActionSpec::Disconnect {
        label: label.to_string(),
    }
}

/// A hand-made plan: a startup task with a decision whose yes output jumps to `Other`.
#[allow(dead_code)]
pub fn decision_plan() -> FlowPlan {
    let mut startup = TaskNode::new(TaskId(0), "Start", TaskKind::StartUp);
    startup.is_startup_task = true;
    startup.actions = vec![
        ActionSpec::Decision(DecisionSpec {
            label: "check".to_string(),
            expression: "5 > 3".to_string(),
            yes: vec![ActionSpec::JumpToTask {
                label: "to other".to_string(),
                target: TaskId(1),
            }],
            no: vec![disconnect("no output")],
        }),
        disconnect("end"),
    ];
    let mut other = TaskNode::new(TaskId(1), "Other", TaskKind::Other);
    other.actions.push(disconnect("end"));
    FlowPlan {
        name: "Decisions".to_string(),
        description: "decision test".to_string(),
        tasks: vec![startup, other],
        startup_task_id: TaskId(0),
    }
}

/// One recorded call against the scripted backend.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateFlow(String),
    ApplySettings,
    AddTask(String, bool),
    AddAction(ActionTarget, ActionRequest),
    Validate,
    Publish,
}

/// Which call should fail, if any.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    CreateFlow,
    AddAction,
    Validate,
    Publish,
}

/// A backend that records every call and answers with canned results.
#[allow(dead_code)]
pub struct ScriptedBackend {
    pub calls: Mutex<Vec<Call>>,
    pub validation: ValidationResult,
    pub fail_at: FailAt,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            validation: ValidationResult::default(),
            fail_at: FailAt::Nothing,
        }
    }

    pub fn with_validation(validation: ValidationResult) -> Self {
        Self {
            validation,
            ..Self::new()
        }
    }

    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len() - 1
    }

    fn check(&self, at: FailAt) -> Result<(), BackendError> {
        if self.fail_at == at {
            Err(BackendError::Network(format!("{:?} timed out", at)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FlowBackend for ScriptedBackend {
    async fn create_flow(
        &self,
        name: &str,
        _description: &str,
        _language: &str,
    ) -> Result<FlowHandle, BackendError> {
        self.check(FailAt::CreateFlow)?;
        self.record(Call::CreateFlow(name.to_string()));
        Ok(FlowHandle(7))
    }

    async fn apply_settings(
        &self,
        _flow: FlowHandle,
        _settings: &FlowSettings,
    ) -> Result<(), BackendError> {
        self.record(Call::ApplySettings);
        Ok(())
    }

    async fn add_task(
        &self,
        _flow: FlowHandle,
        label: &str,
        is_startup: bool,
    ) -> Result<TaskHandle, BackendError> {
        let index = self.record(Call::AddTask(label.to_string(), is_startup));
        Ok(TaskHandle(index as u64))
    }

    async fn add_action(
        &self,
        _flow: FlowHandle,
        target: ActionTarget,
        action: ActionRequest,
    ) -> Result<ActionHandle, BackendError> {
        self.check(FailAt::AddAction)?;
        let index = self.record(Call::AddAction(target, action));
        Ok(ActionHandle(index as u64))
    }

    async fn validate(&self, _flow: FlowHandle) -> Result<ValidationResult, BackendError> {
        self.check(FailAt::Validate)?;
        self.record(Call::Validate);
        Ok(self.validation.clone())
    }

    async fn publish(&self, _flow: FlowHandle) -> Result<PublishResult, BackendError> {
        self.check(FailAt::Publish)?;
        self.record(Call::Publish);
        Ok(PublishResult {
            url: "scripted://flows/Survey".to_string(),
            replaced_existing: false,
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
