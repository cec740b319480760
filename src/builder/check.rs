use crate::error::PlanError;
use crate::plan::{FlowPlan, TaskKind};
use ahash::AHashSet;
use itertools::Itertools;

/// Validate a `FlowPlan` for structural correctness.
///
/// Returns `Ok(())` if the plan is valid, or every violation found.
pub fn check_plan(plan: &FlowPlan) -> Result<(), Vec<PlanError>> {
    let mut errors = Vec::new();

    // 1. Exactly one startup task, and the startup reference points at it.
    let startup_ids = plan
        .tasks
        .iter()
        .filter(|t| t.is_startup_task)
        .map(|t| t.id)
        .collect_vec();
    match startup_ids.as_slice() {
        [] => errors.push(PlanError::NoStartupTask),
        [only] => {
            let points_at_startup = *only == plan.startup_task_id
                && plan
                    .startup_task()
                    .is_some_and(|t| t.kind == TaskKind::StartUp);
            if !points_at_startup {
                errors.push(PlanError::StartupMismatch(plan.startup_task_id));
            }
        }
        many => errors.push(PlanError::MultipleStartupTasks(many.to_vec())),
    }

    // 2. No duplicate ids.
    for id in plan.tasks.iter().map(|t| t.id).duplicates() {
        errors.push(PlanError::DuplicateTaskId(id));
    }

    // 3. Every task has actions and is closed.
    for task in &plan.tasks {
        if task.actions.is_empty() {
            errors.push(PlanError::EmptyTask {
                id: task.id,
                label: task.label.clone(),
            });
        } else if !task.is_closed() {
            errors.push(PlanError::OpenEnded {
                id: task.id,
                label: task.label.clone(),
            });
        }
    }

    // 4. Jumps, including those nested in decision branches, stay inside the plan.
    let known: AHashSet<_> = plan.tasks.iter().map(|t| t.id).collect();
    for task in &plan.tasks {
        for target in task.jump_targets() {
            if !known.contains(&target) {
                errors.push(PlanError::DanglingJump {
                    task: task.id,
                    target,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
