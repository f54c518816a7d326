//! Dependency graph checks and repairs over a plan's steps.

use std::collections::{HashMap, HashSet};

use crate::models::{Change, Plan, Step};

/// An edge found to close a dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackEdge {
    pub step_id: String,
    pub dependency: String,
    /// Ids on the cycle, starting at `dependency`
    pub cycle: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

struct Walk<'a> {
    steps: &'a [Step],
    position: HashMap<&'a str, usize>,
    state: Vec<Visit>,
    stack: Vec<usize>,
    found: Vec<BackEdge>,
}

impl Walk<'_> {
    fn visit(&mut self, i: usize) {
        self.state[i] = Visit::Active;
        self.stack.push(i);

        let steps = self.steps;
        for dep in &steps[i].dependencies {
            let Some(&j) = self.position.get(dep.as_str()) else {
                continue;
            };
            match self.state[j] {
                Visit::New => self.visit(j),
                Visit::Active => {
                    let from = self.stack.iter().position(|&k| k == j).unwrap_or(0);
                    self.found.push(BackEdge {
                        step_id: steps[i].id.clone(),
                        dependency: dep.clone(),
                        cycle: self.stack[from..]
                            .iter()
                            .map(|&k| steps[k].id.clone())
                            .collect(),
                    });
                }
                Visit::Done => {}
            }
        }

        self.stack.pop();
        self.state[i] = Visit::Done;
    }
}

/// Finds the edges whose removal leaves the dependency graph acyclic.
///
/// Depth-first search starting from steps in `order`, following each
/// step's dependencies in listed order; every edge back onto the current
/// path is reported. The result is deterministic for a given plan.
pub fn find_back_edges(steps: &[Step]) -> Vec<BackEdge> {
    let mut position = HashMap::new();
    for (i, step) in steps.iter().enumerate() {
        position.entry(step.id.as_str()).or_insert(i);
    }

    let mut roots: Vec<usize> = (0..steps.len()).collect();
    roots.sort_by_key(|&i| steps[i].order);

    let mut walk = Walk {
        steps,
        position,
        state: vec![Visit::New; steps.len()],
        stack: Vec::new(),
        found: Vec::new(),
    };
    for i in roots {
        if walk.state[i] == Visit::New {
            walk.visit(i);
        }
    }
    walk.found
}

/// Drops dependencies that do not resolve, point at the step itself, or
/// repeat an earlier entry.
pub fn strip_invalid_dependencies(plan: &Plan) -> (Plan, Vec<Change>) {
    let ids: HashSet<&str> = plan.steps.iter().map(|s| s.id.as_str()).collect();
    let mut changes = Vec::new();

    let steps = plan
        .steps
        .iter()
        .map(|step| {
            let mut kept: Vec<String> = Vec::with_capacity(step.dependencies.len());
            for dep in &step.dependencies {
                let reason = if *dep == step.id {
                    Some("self dependency")
                } else if !ids.contains(dep.as_str()) {
                    Some("unknown step")
                } else {
                    None
                };
                match reason {
                    Some(reason) => changes.push(Change::DependencyRemoved {
                        step_id: step.id.clone(),
                        dependency: dep.clone(),
                        reason: reason.to_string(),
                    }),
                    None if !kept.contains(dep) => kept.push(dep.clone()),
                    None => {}
                }
            }
            step.with_dependencies(kept)
        })
        .collect();

    (plan.with_steps(steps), changes)
}

/// Removes every edge that closes a dependency cycle.
pub fn break_cycles(plan: &Plan) -> (Plan, Vec<Change>) {
    let back_edges = find_back_edges(&plan.steps);
    if back_edges.is_empty() {
        return (plan.clone(), Vec::new());
    }

    let doomed: HashSet<(&str, &str)> = back_edges
        .iter()
        .map(|e| (e.step_id.as_str(), e.dependency.as_str()))
        .collect();
    let steps = plan
        .steps
        .iter()
        .map(|step| {
            let kept = step
                .dependencies
                .iter()
                .filter(|dep| !doomed.contains(&(step.id.as_str(), dep.as_str())))
                .cloned()
                .collect();
            step.with_dependencies(kept)
        })
        .collect();

    let changes = back_edges
        .iter()
        .map(|edge| Change::DependencyRemoved {
            step_id: edge.step_id.clone(),
            dependency: edge.dependency.clone(),
            reason: format!("closes cycle {}", edge.cycle.join(" -> ")),
        })
        .collect();

    (plan.with_steps(steps), changes)
}

/// Removes dependencies on any of `removed`.
pub fn strip_dependencies_on(plan: &Plan, removed: &HashSet<String>) -> (Plan, Vec<Change>) {
    let mut changes = Vec::new();
    let steps = plan
        .steps
        .iter()
        .map(|step| {
            let (gone, kept): (Vec<String>, Vec<String>) = step
                .dependencies
                .iter()
                .cloned()
                .partition(|dep| removed.contains(dep));
            for dep in gone {
                changes.push(Change::DependencyRemoved {
                    step_id: step.id.clone(),
                    dependency: dep,
                    reason: "step dropped".to_string(),
                });
            }
            step.with_dependencies(kept)
        })
        .collect();
    (plan.with_steps(steps), changes)
}
