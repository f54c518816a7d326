//! Abstraction-level policy for steps.

use log::debug;

use crate::models::{AbstractionLevel, Change, Plan, StepCategory};

/// Level a step of `category` must have inside a phase at `phase_level`.
///
/// `refine` follows its phase; it has no fixed level when the phase is
/// unknown.
pub fn expected_level(
    category: StepCategory,
    phase_level: Option<AbstractionLevel>,
) -> Option<AbstractionLevel> {
    match category {
        StepCategory::ClarifyGoal => Some(AbstractionLevel::Abstract),
        StepCategory::GatherContext | StepCategory::ScanCode | StepCategory::DesignSolution => {
            Some(AbstractionLevel::Planning)
        }
        StepCategory::EditCode | StepCategory::RunTests => Some(AbstractionLevel::Execution),
        StepCategory::Refine => phase_level,
    }
}

/// Rewrites every step whose level disagrees with the policy.
pub fn apply_level_policy(plan: &Plan) -> (Plan, Vec<Change>) {
    let mut changes = Vec::new();
    let steps = plan
        .steps
        .iter()
        .map(|step| {
            let phase_level = plan.phase(&step.phase_id).map(|p| p.abstraction_level);
            match expected_level(step.category, phase_level) {
                Some(level) if level != step.abstraction_level => {
                    debug!(
                        "Step {} ({}) corrected from {} to {}",
                        step.id, step.category, step.abstraction_level, level
                    );
                    changes.push(Change::LevelCorrected {
                        step_id: step.id.clone(),
                        from: step.abstraction_level,
                        to: level,
                    });
                    step.with_level(level)
                }
                _ => step.clone(),
            }
        })
        .collect();

    (plan.with_steps(steps), changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phase, Step, StepStatus, TaskCategory};

    fn step(id: &str, category: StepCategory, level: AbstractionLevel) -> Step {
        Step {
            id: id.to_string(),
            phase_id: "design".to_string(),
            abstraction_level: level,
            order: 0,
            category,
            title: id.to_string(),
            summary: String::new(),
            scope_id: None,
            dependencies: vec![],
            suggested_tools: vec![],
            status: StepStatus::Todo,
        }
    }

    fn plan(steps: Vec<Step>) -> Plan {
        Plan {
            goal: "g".to_string(),
            category: TaskCategory::Feature,
            phases: vec![Phase {
                id: "design".to_string(),
                name: "Design".to_string(),
                abstraction_level: AbstractionLevel::Planning,
                order: 0,
            }],
            scopes: vec![],
            steps,
        }
    }

    #[test]
    fn test_level_table() {
        use AbstractionLevel::*;
        assert_eq!(expected_level(StepCategory::ClarifyGoal, None), Some(Abstract));
        assert_eq!(expected_level(StepCategory::ScanCode, None), Some(Planning));
        assert_eq!(expected_level(StepCategory::DesignSolution, None), Some(Planning));
        assert_eq!(expected_level(StepCategory::RunTests, None), Some(Execution));
        assert_eq!(expected_level(StepCategory::Refine, Some(Abstract)), Some(Abstract));
        assert_eq!(expected_level(StepCategory::Refine, None), None);
    }

    #[test]
    fn test_corrections_are_recorded() {
        let p = plan(vec![
            step("edit", StepCategory::EditCode, AbstractionLevel::Planning),
            step("refine", StepCategory::Refine, AbstractionLevel::Execution),
            step("scan", StepCategory::ScanCode, AbstractionLevel::Planning),
        ]);
        let (fixed, changes) = apply_level_policy(&p);

        assert_eq!(fixed.steps[0].abstraction_level, AbstractionLevel::Execution);
        assert_eq!(fixed.steps[1].abstraction_level, AbstractionLevel::Planning);
        assert_eq!(changes.len(), 2);
        assert_eq!(p.steps[0].abstraction_level, AbstractionLevel::Planning);
    }

    #[test]
    fn test_policy_is_idempotent() {
        let p = plan(vec![
            step("a", StepCategory::ClarifyGoal, AbstractionLevel::Execution),
            step("b", StepCategory::Refine, AbstractionLevel::Abstract),
        ]);
        let (once, _) = apply_level_policy(&p);
        let (twice, changes) = apply_level_policy(&once);
        assert_eq!(once, twice);
        assert!(changes.is_empty());
    }
}
