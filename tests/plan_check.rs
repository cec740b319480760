//! Tests for structural plan checks.
mod common;
use common::{decision_plan, disconnect, scenario_config};
use survey_flow::prelude::*;

#[test]
fn test_built_plans_pass() {
    assert!(check_plan(&build_survey_flow(&scenario_config()).unwrap()).is_ok());
    assert!(check_plan(&decision_plan()).is_ok());
}

#[test]
fn test_missing_startup_task() {
    let mut plan = decision_plan();
    plan.tasks[0].is_startup_task = false;
    assert_eq!(check_plan(&plan).unwrap_err(), vec![PlanError::NoStartupTask]);
}

#[test]
fn test_multiple_startup_tasks() {
    let mut plan = decision_plan();
    plan.tasks[1].is_startup_task = true;
    assert_eq!(
        check_plan(&plan).unwrap_err(),
        vec![PlanError::MultipleStartupTasks(vec![TaskId(0), TaskId(1)])]
    );
}

#[test]
fn test_startup_reference_must_match() {
    let mut plan = decision_plan();
    plan.startup_task_id = TaskId(1);
    assert_eq!(
        check_plan(&plan).unwrap_err(),
        vec![PlanError::StartupMismatch(TaskId(1))]
    );

    let mut plan = decision_plan();
    plan.tasks[0].kind = TaskKind::Other;
    assert_eq!(
        check_plan(&plan).unwrap_err(),
        vec![PlanError::StartupMismatch(TaskId(0))]
    );
}

#[test]
fn test_duplicate_ids() {
    let mut plan = decision_plan();
    let mut copy = plan.tasks[1].clone();
    copy.label = "Other again".to_string();
    plan.tasks.push(copy);
    assert_eq!(
        check_plan(&plan).unwrap_err(),
        vec![PlanError::DuplicateTaskId(TaskId(1))]
    );
}

#[test]
fn test_empty_and_open_ended_tasks() {
    let mut plan = decision_plan();
    plan.tasks[1].actions.clear();
    plan.tasks.push(TaskNode {
        id: TaskId(2),
        label: "Open".to_string(),
        kind: TaskKind::Other,
        is_startup_task: false,
        actions: vec![ActionSpec::CallDataAction {
            label: "call".to_string(),
            action_id: "x".to_string(),
        }],
    });

    assert_eq!(
        check_plan(&plan).unwrap_err(),
        vec![
            PlanError::EmptyTask {
                id: TaskId(1),
                label: "Other".to_string(),
            },
            PlanError::OpenEnded {
                id: TaskId(2),
                label: "Open".to_string(),
            },
        ]
    );
}

#[test]
fn test_dangling_jump_inside_decision() {
    let mut plan = decision_plan();
    if let ActionSpec::Decision(decision) = &mut plan.tasks[0].actions[0] {
        decision.no = vec![ActionSpec::JumpToTask {
            label: "nowhere".to_string(),
            target: TaskId(42),
        }];
    }
    assert_eq!(
        check_plan(&plan).unwrap_err(),
        vec![PlanError::DanglingJump {
            task: TaskId(0),
            target: TaskId(42),
        }]
    );
}

#[test]
fn test_all_violations_are_collected() {
    let mut plan = decision_plan();
    plan.tasks[0].is_startup_task = false;
    plan.tasks[1].actions = vec![disconnect("a"), ActionSpec::CallDataAction {
        label: "late".to_string(),
        action_id: "x".to_string(),
    }];
    let errors = check_plan(&plan).unwrap_err();
    assert_eq!(errors.len(), 2);

    let message = BuildError::Plan(errors).to_string();
    assert!(message.contains("No task is flagged as the startup task"));
    assert!(message.contains("; "));
}
