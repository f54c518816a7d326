//! Plan compression engine.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐
//! │  repair  │─▶│  levels  │─▶│  scopes  │─▶│ dechunk  │─▶│ truncate │─▶│  cycles  │
//! │ phases,  │  │          │  │          │  │  steps   │  │          │  │ + safety │
//! │ deps     │  │          │  │          │  │(optional)│  │          │  │   net    │
//! └──────────┘  └──────────┘  └──────────┘  └──────────┘  └──────────┘  └──────────┘
//! ```
//!
//! Every stage takes a plan by reference and returns a new plan plus the
//! [`Change`]s it made. Structural problems never abort the pipeline; they
//! are repaired where possible and reported as warnings otherwise.

pub mod graph;
pub mod levels;
pub mod phases;
pub mod scopes;
pub mod truncate;
pub mod validate;

use log::{debug, info, warn};

use crate::{
    dechunk::dechunk_steps,
    display::CompactPlan,
    error::Result,
    models::{Change, CompressionReport, CompressionStats, Plan},
    params::CompressionLimits,
};

pub use levels::{apply_level_policy, expected_level};
pub use validate::validate_plan;

/// `base`, or `base-2`, `base-3`, ... if `taken` rejects it.
pub(crate) fn unique_id(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}

/// Treats a zero limit as one.
fn clamp_limit(name: &str, value: Option<usize>, warnings: &mut Vec<String>) -> Option<usize> {
    match value {
        Some(0) => {
            push_warning(warnings, format!("{name} of 0 treated as 1"));
            Some(1)
        }
        other => other,
    }
}

fn count_changes(changes: &[Change], pred: impl Fn(&Change) -> bool) -> usize {
    changes.iter().filter(|c| pred(c)).count()
}

/// Compresses `plan` to fit `limits`.
///
/// The input is never modified. The returned plan always satisfies the
/// dependency invariants; any other invariant still violated is listed in
/// the report's warnings.
pub fn compress(plan: &Plan, limits: &CompressionLimits) -> Result<CompressionReport> {
    let mut warnings = Vec::new();
    let mut changes = Vec::new();

    let max_phases = clamp_limit("targetMaxPhases", limits.target_max_phases, &mut warnings);
    let max_steps = clamp_limit("targetMaxSteps", limits.target_max_steps, &mut warnings);
    let max_micro = clamp_limit(
        "maxMicroStepsPerPhase",
        limits.max_micro_steps_per_phase,
        &mut warnings,
    );

    let mut stats = CompressionStats {
        phases_before: plan.phases.len(),
        steps_before: plan.steps.len(),
        ..Default::default()
    };

    if plan.steps.is_empty() {
        push_warning(
            &mut warnings,
            "Plan has no steps; returned unchanged".to_string(),
        );
        stats.phases_after = plan.phases.len();
        return Ok(CompressionReport {
            compact_encoding: CompactPlan(plan).to_string(),
            plan: plan.clone(),
            warnings,
            changes,
            stats,
        });
    }

    debug!("Repairing phases and dependencies");
    let (current, c) = phases::repair_phases(plan);
    changes.extend(c);
    let (current, c) = graph::strip_invalid_dependencies(&current);
    changes.extend(c);

    debug!("Applying level policy");
    let (current, c) = levels::apply_level_policy(&current);
    stats.level_corrections = count_changes(&c, |c| matches!(c, Change::LevelCorrected { .. }));
    changes.extend(c);

    debug!("Repairing scopes");
    let (current, c) = scopes::repair_scopes(&current);
    stats.scope_reassignments =
        count_changes(&c, |c| matches!(c, Change::ScopeReassigned { .. }));
    changes.extend(c);

    let repaired = current.clone();

    let current = match max_micro {
        Some(max) => {
            debug!("Dechunking execution steps (max {max} per group)");
            let outcome = dechunk_steps(&current.steps, max)?;
            stats.steps_merged = outcome.absorbed;
            changes.extend(outcome.changes);
            current.with_steps(outcome.steps)
        }
        None => current,
    };

    debug!("Truncating to phases={max_phases:?} steps={max_steps:?}");
    let (current, c) = truncate::truncate(&current, max_phases, max_steps);
    stats.phases_dropped = count_changes(&c, |c| matches!(c, Change::PhaseDropped { .. }));
    stats.steps_dropped = count_changes(&c, |c| matches!(c, Change::StepDropped { .. }));
    changes.extend(c);

    let (mut current, c) = graph::break_cycles(&current);
    if !c.is_empty() {
        push_warning(
            &mut warnings,
            format!("Removed {} dependencies to break cycles", c.len()),
        );
    }
    changes.extend(c);

    if current.steps.is_empty() {
        let (restored, c) = restore_first_step(&current, &repaired);
        changes.extend(c);
        if let Some(id) = restored.steps.first().map(|s| s.id.clone()) {
            push_warning(
                &mut warnings,
                format!("Compression removed every step; restored step '{id}'"),
            );
        }
        current = restored;
    }

    for issue in validate_plan(&current) {
        push_warning(&mut warnings, format!("Compressed plan is invalid: {issue}"));
    }

    stats.phases_after = current.phases.len();
    stats.steps_after = current.steps.len();
    info!(
        "Compressed plan from {} to {} steps across {} phases",
        stats.steps_before, stats.steps_after, stats.phases_after
    );

    Ok(CompressionReport {
        compact_encoding: CompactPlan(&current).to_string(),
        plan: current,
        warnings,
        changes,
        stats,
    })
}

/// Re-inserts the lowest-order step of `repaired` into an empty plan,
/// moving it to the first remaining phase when its own phase is gone.
fn restore_first_step(current: &Plan, repaired: &Plan) -> (Plan, Vec<Change>) {
    let Some(first) = repaired.steps.iter().min_by_key(|s| s.order) else {
        return (current.clone(), Vec::new());
    };

    let mut phases = current.phases.clone();
    let mut changes = Vec::new();
    let phase_id = if current.phase(&first.phase_id).is_some() {
        first.phase_id.clone()
    } else if let Some(phase) = current.phases_in_order().first() {
        changes.push(Change::PhaseReassigned {
            step_id: first.id.clone(),
            from: first.phase_id.clone(),
            to: phase.id.clone(),
        });
        phase.id.clone()
    } else {
        if let Some(phase) = repaired.phase(&first.phase_id) {
            phases.push(phase.clone());
        }
        first.phase_id.clone()
    };

    let step = first.with_phase(phase_id).with_dependencies(Vec::new());
    changes.push(Change::StepRestored {
        step_id: step.id.clone(),
    });

    let (plan, level_changes) =
        levels::apply_level_policy(&current.with_phases_and_steps(phases, vec![step]));
    changes.extend(level_changes);
    (plan, changes)
}
