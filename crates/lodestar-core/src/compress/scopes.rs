//! Scope repair: exactly one global scope, every scope reference resolves.

use std::collections::HashSet;

use log::debug;

use super::unique_id;
use crate::models::{Change, Plan, Scope, ScopeKind};

/// Base id of a synthesized workspace scope.
pub const GLOBAL_SCOPE_ID: &str = "scope-global";

/// Ensures a single global scope and points dangling scope references at it.
///
/// Extra global scopes are removed and their steps moved to the first one.
pub fn repair_scopes(plan: &Plan) -> (Plan, Vec<Change>) {
    let mut changes = Vec::new();
    let mut scopes = plan.scopes.clone();

    let global_id = match plan.global_scope() {
        Some(scope) => scope.id.clone(),
        None => {
            let id = unique_id(GLOBAL_SCOPE_ID, |candidate| plan.scope(candidate).is_some());
            debug!("Synthesizing global scope {id}");
            scopes.push(Scope::workspace(id.clone()));
            changes.push(Change::ScopeSynthesized {
                scope_id: id.clone(),
            });
            id
        }
    };

    scopes.retain(|scope| scope.kind != ScopeKind::Global || scope.id == global_id);
    let known: HashSet<&str> = scopes.iter().map(|s| s.id.as_str()).collect();

    let steps = plan
        .steps
        .iter()
        .map(|step| match &step.scope_id {
            Some(scope_id) if !known.contains(scope_id.as_str()) => {
                changes.push(Change::ScopeReassigned {
                    step_id: step.id.clone(),
                    from: scope_id.clone(),
                    to: global_id.clone(),
                });
                step.with_scope(Some(global_id.clone()))
            }
            _ => step.clone(),
        })
        .collect();

    (plan.with_scopes_and_steps(scopes, steps), changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbstractionLevel, Step, StepCategory, StepStatus, TaskCategory};

    fn step(id: &str, scope: Option<&str>) -> Step {
        Step {
            id: id.to_string(),
            phase_id: "p".to_string(),
            abstraction_level: AbstractionLevel::Execution,
            order: 0,
            category: StepCategory::EditCode,
            title: id.to_string(),
            summary: String::new(),
            scope_id: scope.map(str::to_string),
            dependencies: vec![],
            suggested_tools: vec![],
            status: StepStatus::Todo,
        }
    }

    fn file_scope(id: &str) -> Scope {
        Scope {
            id: id.to_string(),
            kind: ScopeKind::File,
            label: id.to_string(),
            selector: format!("{id}.rs"),
        }
    }

    fn plan(scopes: Vec<Scope>, steps: Vec<Step>) -> Plan {
        Plan {
            goal: "g".to_string(),
            category: TaskCategory::Bugfix,
            phases: vec![],
            scopes,
            steps,
        }
    }

    #[test]
    fn test_synthesizes_global_and_reassigns_dangling() {
        let p = plan(
            vec![file_scope("auth")],
            vec![step("a", Some("auth")), step("b", Some("gone")), step("c", None)],
        );
        let (fixed, changes) = repair_scopes(&p);

        let global = fixed.global_scope().unwrap();
        assert_eq!(global.id, GLOBAL_SCOPE_ID);
        assert_eq!(global.label, "Workspace");
        assert_eq!(global.selector, "workspace root");
        assert_eq!(fixed.steps[0].scope_id.as_deref(), Some("auth"));
        assert_eq!(fixed.steps[1].scope_id.as_deref(), Some(GLOBAL_SCOPE_ID));
        assert_eq!(fixed.steps[2].scope_id, None);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_extra_global_scopes_are_collapsed() {
        let p = plan(
            vec![Scope::workspace("g1"), Scope::workspace("g2")],
            vec![step("a", Some("g2"))],
        );
        let (fixed, _) = repair_scopes(&p);

        let globals = fixed
            .scopes
            .iter()
            .filter(|s| s.kind == ScopeKind::Global)
            .count();
        assert_eq!(globals, 1);
        assert_eq!(fixed.steps[0].scope_id.as_deref(), Some("g1"));
    }

    #[test]
    fn test_synthesized_id_avoids_collisions() {
        let p = plan(vec![file_scope(GLOBAL_SCOPE_ID)], vec![]);
        let (fixed, _) = repair_scopes(&p);
        assert_eq!(fixed.global_scope().unwrap().id, "scope-global-2");
    }
}
