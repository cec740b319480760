use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable synthetic key of a task, unique within one `FlowPlan`.
///
/// Ids are ordinals assigned in construction order, so the startup task is always `TaskId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// The role a task plays in the survey flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    StartUp,
    Login,
    CreateInteraction,
    Question,
    CloseTheLoop,
    Other,
}

/// Data types understood by the platform's update-data statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Integer,
    String,
    StringCollection,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Integer => "Integer",
            DataType::String => "String",
            DataType::StringCollection => "String Collection",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `variable = expression` assignment inside an update-data action.
///
/// The expression text belongs to the platform's expression language and is never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub data_type: DataType,
    pub variable: String,
    pub expression: String,
}

/// Maps a participant-data attribute (an expression, usually a quoted name) onto a flow variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair {
    pub attribute_name: String,
    pub variable: String,
}

/// A two-way branch. Each output holds its own ordered action sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSpec {
    pub label: String,
    pub expression: String,
    pub yes: Vec<ActionSpec>,
    pub no: Vec<ActionSpec>,
}

/// One step inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSpec {
    UpdateData {
        label: String,
        statements: Vec<UpdateStatement>,
    },
    Decision(DecisionSpec),
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
        target: TaskId,
    },
    Disconnect {
        label: String,
    },
}

impl ActionSpec {
    pub fn label(&self) -> &str {
        match self {
            ActionSpec::UpdateData { label, .. }
            | ActionSpec::GetParticipantData { label, .. }
            | ActionSpec::CallDataAction { label, .. }
            | ActionSpec::JumpToTask { label, .. }
            | ActionSpec::Disconnect { label } => label,
            ActionSpec::Decision(decision) => &decision.label,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ActionSpec::UpdateData { .. } => "UpdateData",
            ActionSpec::Decision(_) => "Decision",
            ActionSpec::GetParticipantData { .. } => "GetParticipantData",
            ActionSpec::CallDataAction { .. } => "CallDataAction",
            ActionSpec::JumpToTask { .. } => "JumpToTask",
            ActionSpec::Disconnect { .. } => "Disconnect",
        }
    }

    /// Terminal actions end the task: control never falls through past them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionSpec::Disconnect { .. } | ActionSpec::JumpToTask { .. }
        )
    }

    /// Collects every jump target reachable from this action, including nested decision branches.
    pub fn collect_jump_targets(&self, targets: &mut Vec<TaskId>) {
        match self {
            ActionSpec::JumpToTask { target, .. } => targets.push(*target),
            ActionSpec::Decision(decision) => {
                for action in decision.yes.iter().chain(decision.no.iter()) {
                    action.collect_jump_targets(targets);
                }
            }
            _ => {}
        }
    }
}

/// A named unit of work in the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: TaskId,
    pub label: String,
    pub kind: TaskKind,
    pub is_startup_task: bool,
    pub actions: Vec<ActionSpec>,
}

impl TaskNode {
    pub fn new(id: TaskId, label: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            is_startup_task: false,
            actions: Vec::new(),
        }
    }

    pub fn last_action(&self) -> Option<&ActionSpec> {
        self.actions.last()
    }

    /// A task is closed when its root sequence ends in a terminal action.
    pub fn is_closed(&self) -> bool {
        self.last_action().is_some_and(ActionSpec::is_terminal)
    }

    pub fn jump_targets(&self) -> Vec<TaskId> {
        let mut targets = Vec::new();
        for action in &self.actions {
            action.collect_jump_targets(&mut targets);
        }
        targets
    }
}

/// The complete task graph for one survey flow, ready to be replayed against a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPlan {
    pub name: String,
    pub description: String,
    pub tasks: Vec<TaskNode>,
    pub startup_task_id: TaskId,
}

impl FlowPlan {
    pub fn task(&self, id: TaskId) -> Option<&TaskNode> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn startup_task(&self) -> Option<&TaskNode> {
        self.task(self.startup_task_id)
    }

    pub fn tasks_of_kind(&self, kind: TaskKind) -> impl Iterator<Item = &TaskNode> {
        self.tasks.iter().filter(move |t| t.kind == kind)
    }

    /// Labels of the question tasks, in plan order.
    pub fn question_labels(&self) -> Vec<&str> {
        self.tasks_of_kind(TaskKind::Question)
            .map(|t| t.label.as_str())
            .collect()
    }
}
