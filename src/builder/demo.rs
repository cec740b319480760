use super::{END_OF_TASK_DISCONNECT, check_plan};
use crate::error::{BuildError, ConfigError};
use crate::plan::{ActionSpec, DecisionSpec, FlowPlan, TaskId, TaskKind, TaskNode};

/// A small two-task flow showing nested decisions: a startup task that branches on
/// constant conditions, plus an unrelated task that only disconnects.
pub fn build_decision_demo(name: &str, description: &str) -> Result<FlowPlan, BuildError> {
    if name.trim().is_empty() {
        return Err(ConfigError::EmptyFlowName.into());
    }

    let inner = DecisionSpec {
        label: "otra condicion".to_string(),
        expression: "1 == 1".to_string(),
        yes: Vec::new(),
        no: vec![ActionSpec::Disconnect {
            label: "No output disconnect".to_string(),
        }],
    };
    let outer = DecisionSpec {
        label: "greater than check".to_string(),
        expression: "5 > 3".to_string(),
        yes: vec![
            ActionSpec::Decision(inner),
            ActionSpec::Disconnect {
                label: "yes output disconnect".to_string(),
            },
        ],
        no: Vec::new(),
    };

    let mut startup = TaskNode::new(TaskId(0), "Tarea de inicio", TaskKind::StartUp);
    startup.is_startup_task = true;
    startup.actions = vec![
        ActionSpec::Decision(outer),
        ActionSpec::Disconnect {
            label: END_OF_TASK_DISCONNECT.to_string(),
        },
    ];

    let mut other = TaskNode::new(TaskId(1), "Other", TaskKind::Other);
    other.actions.push(ActionSpec::Disconnect {
        label: END_OF_TASK_DISCONNECT.to_string(),
    });

    let plan = FlowPlan {
        name: name.to_string(),
        description: description.to_string(),
        tasks: vec![startup, other],
        startup_task_id: TaskId(0),
    };
    check_plan(&plan).map_err(BuildError::Plan)?;
    Ok(plan)
}
