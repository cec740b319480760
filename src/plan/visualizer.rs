use super::definition::{ActionSpec, FlowPlan, TaskNode};
use itertools::Itertools;
use std::fmt::Write;

/// Renders a `FlowPlan` as an indented, human-readable tree.
pub struct PlanVisualizer;

impl PlanVisualizer {
    pub fn render(plan: &FlowPlan) -> String {
        let mut output = String::new();
        writeln!(&mut output, "======== FLOW PLAN: {} ========", plan.name).unwrap();
        writeln!(&mut output, "{}", plan.description).unwrap();

        for task in &plan.tasks {
            writeln!(&mut output).unwrap();
            Self::render_task(&mut output, plan, task);
        }

        writeln!(&mut output, "\n================ END OF PLAN ================").unwrap();
        output
    }

    fn render_task(output: &mut String, plan: &FlowPlan, task: &TaskNode) {
        let startup = if task.is_startup_task { ", startup" } else { "" };
        writeln!(
            output,
            "[{}] {} ({:?}{})",
            task.id, task.label, task.kind, startup
        )
        .unwrap();
        for (i, action) in task.actions.iter().enumerate() {
            Self::render_action(output, plan, action, &format!("{:04}", i), 1);
        }
    }

    fn render_action(
        output: &mut String,
        plan: &FlowPlan,
        action: &ActionSpec,
        position: &str,
        depth: usize,
    ) {
        let indent = "  ".repeat(depth);
        let head = format!(
            "{}{}: {:<18} \"{}\"",
            indent,
            position,
            action.kind_name(),
            action.label()
        );
        match action {
            ActionSpec::UpdateData { statements, .. } => {
                writeln!(output, "{}", head).unwrap();
                for statement in statements {
                    writeln!(
                        output,
                        "{}        {} : {} = {}",
                        indent, statement.variable, statement.data_type, statement.expression
                    )
                    .unwrap();
                }
            }
            ActionSpec::GetParticipantData { attributes, .. } => {
                let pairs = attributes
                    .iter()
                    .map(|p| format!("{} -> {}", p.attribute_name, p.variable))
                    .join(", ");
                writeln!(output, "{} [{}]", head, pairs).unwrap();
            }
            ActionSpec::CallDataAction { action_id, .. } => {
                writeln!(output, "{} id={}", head, action_id).unwrap();
            }
            ActionSpec::JumpToTask { target, .. } => {
                let target_label = plan
                    .task(*target)
                    .map_or("<missing>", |t| t.label.as_str());
                writeln!(output, "{} -> {} ({})", head, target, target_label).unwrap();
            }
            ActionSpec::Disconnect { .. } => {
                writeln!(output, "{}", head).unwrap();
            }
            ActionSpec::Decision(decision) => {
                writeln!(output, "{} if {}", head, decision.expression).unwrap();
                for (branch, actions) in [("yes", &decision.yes), ("no", &decision.no)] {
                    writeln!(output, "{}  {}:", indent, branch).unwrap();
                    for (i, nested) in actions.iter().enumerate() {
                        Self::render_action(
                            output,
                            plan,
                            nested,
                            &format!("{}.{}", position, i),
                            depth + 2,
                        );
                    }
                }
            }
        }
    }
}
