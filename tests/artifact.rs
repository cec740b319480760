//! Tests for plan artifacts, JSON export and the text rendering.
mod common;
use common::{decision_plan, scenario_config};
use survey_flow::prelude::*;

#[test]
fn test_artifact_save_and_load() {
    let plan = build_survey_flow(&scenario_config()).unwrap();
    let path = std::env::temp_dir().join("survey_flow_artifact_test.bin");
    let path = path.to_str().unwrap();

    plan.save(path).unwrap();
    let loaded = FlowPlan::from_file(path).unwrap();
    assert_eq!(loaded, plan);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_artifact_keeps_decision_branches() {
    let plan = decision_plan();
    let bytes = plan.to_bytes().unwrap();
    assert_eq!(FlowPlan::from_bytes(&bytes).unwrap(), plan);
}

#[test]
fn test_artifact_errors() {
    let err = FlowPlan::from_file("does/not/exist.bin").unwrap_err();
    assert!(err.to_string().contains("Could not open file"));

    let err = FlowPlan::from_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
    assert!(err.to_string().contains("Deserialization failed"));
}

#[test]
fn test_json_export() {
    let plan = build_survey_flow(&scenario_config()).unwrap();
    let json = plan.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "Survey");
    assert_eq!(value["tasks"].as_array().unwrap().len(), 7);
    assert_eq!(value["tasks"][0]["kind"], "StartUp");
    assert_eq!(value["startup_task_id"], 0);
}

#[test]
fn test_visualizer_lists_every_task() {
    let plan = build_survey_flow(&scenario_config()).unwrap();
    let text = PlanVisualizer::render(&plan);

    assert!(text.starts_with("======== FLOW PLAN: Survey ========"));
    assert!(text.contains("[task#0] StartUpTask (StartUp, startup)"));
    assert!(text.contains("[task#5] Question 3 (Question)"));
    assert!(text.contains("-> task#1 (Login)"));
    assert!(text.contains("id=abc"));
    assert!(text.contains("Flow.encabezado : Boolean = false"));
    assert!(text.trim_end().ends_with("================ END OF PLAN ================"));
}

#[test]
fn test_visualizer_nests_decisions() {
    let text = PlanVisualizer::render(&decision_plan());

    assert!(text.contains("if 5 > 3"));
    assert!(text.contains("  yes:"));
    assert!(text.contains("0000.0: JumpToTask"));
    assert!(text.contains("-> task#1 (Other)"));
    assert!(text.contains("  no:"));
}
