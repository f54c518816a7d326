//! Global truncation to the phase and per-phase step limits.

use std::collections::HashSet;

use log::debug;

use super::graph::strip_dependencies_on;
use crate::models::{Change, Plan};

/// Drops phases beyond `max_phases` (by order) with their steps, then steps
/// beyond `max_steps` in each phase (keeping the lowest orders), then every
/// dependency on a dropped step.
pub fn truncate(plan: &Plan, max_phases: Option<usize>, max_steps: Option<usize>) -> (Plan, Vec<Change>) {
    let mut changes = Vec::new();
    let ordered = plan.phases_in_order();

    let kept_phases: HashSet<&str> = match max_phases {
        Some(max) => ordered.iter().take(max).map(|p| p.id.as_str()).collect(),
        None => ordered.iter().map(|p| p.id.as_str()).collect(),
    };
    for phase in ordered.iter().filter(|p| !kept_phases.contains(p.id.as_str())) {
        debug!("Dropping phase {}", phase.id);
        changes.push(Change::PhaseDropped {
            phase_id: phase.id.clone(),
        });
    }

    let mut dropped: HashSet<String> = HashSet::new();
    for step in &plan.steps {
        if !kept_phases.contains(step.phase_id.as_str()) {
            dropped.insert(step.id.clone());
            changes.push(Change::StepDropped {
                step_id: step.id.clone(),
                reason: format!("phase {} dropped", step.phase_id),
            });
        }
    }

    if let Some(max) = max_steps {
        for phase in ordered.iter().filter(|p| kept_phases.contains(p.id.as_str())) {
            let mut members: Vec<_> = plan
                .steps
                .iter()
                .filter(|s| s.phase_id == phase.id)
                .collect();
            members.sort_by_key(|s| s.order);
            for step in members.into_iter().skip(max) {
                dropped.insert(step.id.clone());
                changes.push(Change::StepDropped {
                    step_id: step.id.clone(),
                    reason: format!("over the limit of {} steps in phase {}", max, phase.id),
                });
            }
        }
    }

    let phases = plan
        .phases
        .iter()
        .filter(|p| kept_phases.contains(p.id.as_str()))
        .cloned()
        .collect();
    let steps = plan
        .steps
        .iter()
        .filter(|s| !dropped.contains(&s.id))
        .cloned()
        .collect();

    let (plan, dependency_changes) =
        strip_dependencies_on(&plan.with_phases_and_steps(phases, steps), &dropped);
    changes.extend(dependency_changes);
    (plan, changes)
}
