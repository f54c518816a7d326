//! Phase repair: every step belongs to an existing phase.

use super::unique_id;
use crate::models::{AbstractionLevel, Change, Phase, Plan};

/// Base id of a synthesized phase.
pub const SYNTHESIZED_PHASE_ID: &str = "phase-execution";

/// Points dangling phase references at the last phase.
///
/// A plan with steps but no phases first gets one execution-level phase.
pub fn repair_phases(plan: &Plan) -> (Plan, Vec<Change>) {
    let mut changes = Vec::new();
    let mut phases = plan.phases.clone();

    if phases.is_empty() && !plan.steps.is_empty() {
        let id = unique_id(SYNTHESIZED_PHASE_ID, |candidate| {
            plan.steps.iter().any(|s| s.phase_id == candidate)
        });
        phases.push(Phase {
            id: id.clone(),
            name: "Execution".to_string(),
            abstraction_level: AbstractionLevel::Execution,
            order: 0,
        });
        changes.push(Change::PhaseSynthesized { phase_id: id });
    }

    let Some(last) = phases.iter().max_by_key(|p| p.order).map(|p| p.id.clone()) else {
        return (plan.clone(), changes);
    };

    let steps = plan
        .steps
        .iter()
        .map(|step| {
            if phases.iter().any(|p| p.id == step.phase_id) {
                step.clone()
            } else {
                changes.push(Change::PhaseReassigned {
                    step_id: step.id.clone(),
                    from: step.phase_id.clone(),
                    to: last.clone(),
                });
                step.with_phase(last.clone())
            }
        })
        .collect();

    (plan.with_phases_and_steps(phases, steps), changes)
}
