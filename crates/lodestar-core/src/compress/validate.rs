//! Structural checks on a plan, without repairing anything.

use std::collections::HashSet;

use super::graph::find_back_edges;
use crate::models::{Plan, ScopeKind, ValidationIssue};

/// Lists every structural invariant `plan` violates.
///
/// An empty list means the plan is well formed: it has phases and steps,
/// exactly one global scope, unique step ids, every reference resolves and
/// the dependency graph is acyclic.
pub fn validate_plan(plan: &Plan) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if plan.phases.is_empty() {
        issues.push(ValidationIssue::NoPhases);
    }
    if plan.steps.is_empty() {
        issues.push(ValidationIssue::NoSteps);
    }

    let globals = plan
        .scopes
        .iter()
        .filter(|s| s.kind == ScopeKind::Global)
        .count();
    if globals != 1 {
        issues.push(ValidationIssue::GlobalScopeCount { count: globals });
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for step in &plan.steps {
        if !seen.insert(step.id.as_str()) && reported.insert(step.id.as_str()) {
            issues.push(ValidationIssue::DuplicateStepId {
                step_id: step.id.clone(),
            });
        }
    }

    for step in &plan.steps {
        if plan.phase(&step.phase_id).is_none() {
            issues.push(ValidationIssue::UnknownPhase {
                step_id: step.id.clone(),
                phase_id: step.phase_id.clone(),
            });
        }
        if let Some(scope_id) = &step.scope_id {
            if plan.scope(scope_id).is_none() {
                issues.push(ValidationIssue::UnknownScope {
                    step_id: step.id.clone(),
                    scope_id: scope_id.clone(),
                });
            }
        }
        for dep in &step.dependencies {
            if *dep == step.id {
                issues.push(ValidationIssue::SelfDependency {
                    step_id: step.id.clone(),
                });
            } else if !seen.contains(dep.as_str()) {
                issues.push(ValidationIssue::UnknownDependency {
                    step_id: step.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    for edge in find_back_edges(&plan.steps) {
        if edge.cycle.len() > 1 {
            issues.push(ValidationIssue::DependencyCycle {
                step_ids: edge.cycle,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AbstractionLevel, Phase, Scope, Step, StepCategory, StepStatus, TaskCategory,
    };

    fn step(id: &str, deps: &[&str]) -> Step {
        Step {
            id: id.to_string(),
            phase_id: "p".to_string(),
            abstraction_level: AbstractionLevel::Execution,
            order: 0,
            category: StepCategory::EditCode,
            title: id.to_string(),
            summary: String::new(),
            scope_id: Some("g".to_string()),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            suggested_tools: vec![],
            status: StepStatus::Todo,
        }
    }

    fn plan(steps: Vec<Step>) -> Plan {
        Plan {
            goal: "g".to_string(),
            category: TaskCategory::Other,
            phases: vec![Phase {
                id: "p".to_string(),
                name: "Work".to_string(),
                abstraction_level: AbstractionLevel::Execution,
                order: 0,
            }],
            scopes: vec![Scope::workspace("g")],
            steps,
        }
    }

    #[test]
    fn test_well_formed_plan_has_no_issues() {
        let p = plan(vec![step("a", &[]), step("b", &["a"])]);
        assert!(validate_plan(&p).is_empty());
    }

    #[test]
    fn test_reports_each_kind_of_issue() {
        let mut p = plan(vec![
            step("a", &["b"]),
            step("b", &["a", "ghost"]),
            step("c", &["c"]),
            step("c", &[]),
        ]);
        p.steps[0].phase_id = "nowhere".to_string();
        p.steps[1].scope_id = Some("lost".to_string());
        p.scopes.clear();

        let issues = validate_plan(&p);

        assert!(issues.contains(&ValidationIssue::GlobalScopeCount { count: 0 }));
        assert!(issues.contains(&ValidationIssue::DuplicateStepId {
            step_id: "c".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::UnknownPhase {
            step_id: "a".to_string(),
            phase_id: "nowhere".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::UnknownScope {
            step_id: "b".to_string(),
            scope_id: "lost".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::UnknownDependency {
            step_id: "b".to_string(),
            dependency: "ghost".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::SelfDependency {
            step_id: "c".to_string()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::DependencyCycle { step_ids } if step_ids.len() == 2)));
    }

    #[test]
    fn test_empty_plan() {
        let mut p = plan(vec![]);
        p.phases.clear();
        let issues = validate_plan(&p);
        assert!(issues.contains(&ValidationIssue::NoPhases));
        assert!(issues.contains(&ValidationIssue::NoSteps));
    }
}
