//! Dechunking of plan steps.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::{merge_batch, Mergeable};
use crate::{
    error::Result,
    models::{AbstractionLevel, Change, Step, StepCategory},
};

/// Appends `items` to `target`, skipping values already present.
fn extend_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

impl Mergeable for Step {
    const NOUN: &'static str = "steps";

    fn synthesize(mut batch: Vec<Self>) -> Self {
        batch.sort_by_key(|step| step.order);
        let order = batch[0].order;

        let mut merged = batch.remove(0);
        let mut summaries = vec![merged.summary.clone()];
        for step in batch {
            summaries.push(step.summary);
            extend_unique(&mut merged.suggested_tools, step.suggested_tools);
            extend_unique(&mut merged.dependencies, step.dependencies);
        }
        summaries.retain(|s| !s.is_empty());

        merged.summary = summaries.join("; ");
        merged.order = order;
        merged
    }
}

/// Steps after dechunking and what was done to them.
#[derive(Debug, Clone, Default)]
pub struct StepMergeOutcome {
    pub steps: Vec<Step>,
    pub changes: Vec<Change>,
    /// Steps absorbed into another step
    pub absorbed: usize,
}

type GroupKey = (String, Option<String>, StepCategory);

/// Merges over-granular execution steps.
///
/// Execution-level steps are grouped by `(phase, scope, category)`. A group
/// larger than `max_per_group` collapses into its lowest-order member.
/// Every dependency on an absorbed step is then redirected to the step that
/// absorbed it, and duplicate or self-referencing edges are dropped.
pub fn dechunk_steps(steps: &[Step], max_per_group: usize) -> Result<StepMergeOutcome> {
    let mut groups: Vec<(GroupKey, Vec<&Step>)> = Vec::new();
    for step in steps
        .iter()
        .filter(|s| s.abstraction_level == AbstractionLevel::Execution)
    {
        let key = (step.phase_id.clone(), step.scope_id.clone(), step.category);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(step),
            None => groups.push((key, vec![step])),
        }
    }

    let mut outcome = StepMergeOutcome::default();
    let mut redirects: HashMap<String, String> = HashMap::new();
    let mut merged_by_id: HashMap<String, Step> = HashMap::new();

    for ((phase_id, _, category), members) in groups {
        if members.len() <= max_per_group {
            continue;
        }
        debug!(
            "Merging {} {} steps in phase {}",
            members.len(),
            category,
            phase_id
        );

        let batch: Vec<Step> = members.into_iter().cloned().collect();
        let merged = merge_batch(batch.clone())?;
        let absorbed: Vec<String> = batch
            .into_iter()
            .map(|s| s.id)
            .filter(|id| *id != merged.id)
            .collect();

        for id in &absorbed {
            redirects.insert(id.clone(), merged.id.clone());
        }
        outcome.absorbed += absorbed.len();
        outcome.changes.push(Change::StepsMerged {
            into: merged.id.clone(),
            absorbed,
        });
        merged_by_id.insert(merged.id.clone(), merged);
    }

    outcome.steps = steps
        .iter()
        .filter(|step| !redirects.contains_key(&step.id))
        .map(|step| {
            let step = merged_by_id.get(&step.id).unwrap_or(step);
            redirect_dependencies(step, &redirects)
        })
        .collect();

    drop_merge_cycles(steps, &redirects, &merged_by_id, &mut outcome);
    Ok(outcome)
}

/// Whether `target` is reachable from `from` along dependency edges.
fn reaches<'a>(steps: &'a [Step], from: &'a str, target: &str) -> bool {
    let by_id: HashMap<&str, &Step> = steps.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !seen.insert(id) {
            continue;
        }
        if let Some(step) = by_id.get(id) {
            stack.extend(step.dependencies.iter().map(String::as_str));
        }
    }
    false
}

/// Removes dependencies a merged step inherited from the steps it absorbed
/// when they lead back to the merged step. The merged step's own edges are
/// kept, so the ordering the plan stated survives the merge.
fn drop_merge_cycles(
    steps: &[Step],
    redirects: &HashMap<String, String>,
    merged_by_id: &HashMap<String, Step>,
    outcome: &mut StepMergeOutcome,
) {
    let mut merged_ids: Vec<&String> = merged_by_id.keys().collect();
    merged_ids.sort();

    for id in merged_ids {
        let own = steps
            .iter()
            .find(|s| &s.id == id)
            .map(|s| redirect_dependencies(s, redirects));
        let Some(pos) = outcome.steps.iter().position(|s| &s.id == id) else {
            continue;
        };
        let inherited: Vec<String> = outcome.steps[pos]
            .dependencies
            .iter()
            .filter(|dep| !own.as_ref().is_some_and(|o| o.depends_on(dep)))
            .cloned()
            .collect();

        for dep in inherited {
            if !reaches(&outcome.steps, &dep, id) {
                continue;
            }
            debug!("Dropping inherited dependency {id} -> {dep}; it closes a cycle");
            let kept = outcome.steps[pos]
                .dependencies
                .iter()
                .filter(|d| **d != dep)
                .cloned()
                .collect();
            outcome.steps[pos] = outcome.steps[pos].with_dependencies(kept);
            outcome.changes.push(Change::DependencyRemoved {
                step_id: id.clone(),
                dependency: dep.clone(),
                reason: format!("inherited by merge and closes cycle {id} -> {dep} -> {id}"),
            });
        }
    }
}

/// Rewrites a step's dependencies through the redirect map.
pub(crate) fn redirect_dependencies(step: &Step, redirects: &HashMap<String, String>) -> Step {
    let mut dependencies: Vec<String> = Vec::with_capacity(step.dependencies.len());
    for dep in &step.dependencies {
        let target = redirects.get(dep).unwrap_or(dep);
        if *target != step.id && !dependencies.contains(target) {
            dependencies.push(target.clone());
        }
    }
    step.with_dependencies(dependencies)
}
