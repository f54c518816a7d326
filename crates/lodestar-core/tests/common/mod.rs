#![allow(dead_code)]

use std::collections::HashSet;

use lodestar_core::models::{
    AbstractionLevel, Phase, Plan, Scope, ScopeKind, Step, StepCategory, StepStatus, TaskCategory,
};

pub fn phase(id: &str, level: AbstractionLevel, order: u32) -> Phase {
    Phase {
        id: id.to_string(),
        name: id.to_string(),
        abstraction_level: level,
        order,
    }
}

pub fn step(id: &str, phase_id: &str, category: StepCategory, order: u32, deps: &[&str]) -> Step {
    Step {
        id: id.to_string(),
        phase_id: phase_id.to_string(),
        abstraction_level: AbstractionLevel::Execution,
        order,
        category,
        title: format!("Step {id}"),
        summary: format!("Work for {id}"),
        scope_id: None,
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        suggested_tools: vec![],
        status: StepStatus::Todo,
    }
}

pub fn scope(id: &str, kind: ScopeKind, selector: &str) -> Scope {
    Scope {
        id: id.to_string(),
        kind,
        label: id.to_string(),
        selector: selector.to_string(),
    }
}

/// A bugfix plan with the usual upstream defects: wrong levels, a dangling
/// scope, no global scope and a run of tiny edits on one file.
pub fn bugfix_plan() -> Plan {
    use AbstractionLevel::*;
    use StepCategory::*;

    let session = Some("session".to_string());
    let mut steps = vec![
        step("clarify", "understand", ClarifyGoal, 0, &[]),
        step("scan", "investigate", ScanCode, 1, &["clarify"]),
        step("design", "investigate", DesignSolution, 2, &["scan"]),
    ];
    for i in 0..6 {
        let deps: Vec<String> = if i == 0 {
            vec!["design".to_string()]
        } else {
            vec![format!("edit{}", i - 1)]
        };
        let mut edit = step(&format!("edit{i}"), "implement", EditCode, 3 + i, &[]);
        edit.dependencies = deps;
        edit.scope_id = session.clone();
        edit.suggested_tools = vec!["edit_file".to_string()];
        steps.push(edit);
    }
    let mut tests = step("tests", "verify", RunTests, 10, &["edit5"]);
    tests.scope_id = Some("tests-dir".to_string());
    steps.push(tests);
    let mut refine = step("refine", "verify", Refine, 11, &["tests"]);
    refine.abstraction_level = Abstract;
    steps.push(refine);

    Plan {
        goal: "Fix session refresh race".to_string(),
        category: TaskCategory::Bugfix,
        phases: vec![
            phase("understand", Abstract, 0),
            phase("investigate", Planning, 1),
            phase("implement", Execution, 2),
            phase("verify", Execution, 3),
        ],
        scopes: vec![scope("session", ScopeKind::File, "src/auth/session.rs")],
        steps,
    }
}

/// Five phases with two steps each, each phase depending on the previous.
pub fn five_phase_plan() -> Plan {
    let phases = (1..=5)
        .map(|i| phase(&format!("p{i}"), AbstractionLevel::Execution, i))
        .collect();
    let mut steps = Vec::new();
    for i in 1..=5u32 {
        for j in 0..2u32 {
            let deps = if i > 1 {
                vec![format!("s{}-0", i - 1)]
            } else {
                vec![]
            };
            let mut s = step(
                &format!("s{i}-{j}"),
                &format!("p{i}"),
                StepCategory::EditCode,
                i * 10 + j,
                &[],
            );
            s.dependencies = deps;
            steps.push(s);
        }
    }
    Plan {
        goal: "Five phases".to_string(),
        category: TaskCategory::Feature,
        phases,
        scopes: vec![Scope::workspace("ws")],
        steps,
    }
}

/// Asserts every dependency resolves, none is a self-reference and the
/// dependency graph is acyclic.
pub fn assert_dependency_integrity(plan: &Plan) {
    let ids: HashSet<&str> = plan.steps.iter().map(|s| s.id.as_str()).collect();
    for step in &plan.steps {
        for dep in &step.dependencies {
            assert_ne!(dep, &step.id, "self dependency on {}", step.id);
            assert!(ids.contains(dep.as_str()), "{} depends on missing {}", step.id, dep);
        }
    }

    // Kahn's algorithm: every step must be removable
    let mut remaining: Vec<&Step> = plan.steps.iter().collect();
    let mut done: HashSet<&str> = HashSet::new();
    while !remaining.is_empty() {
        let before = remaining.len();
        remaining.retain(|s| {
            if s.dependencies.iter().all(|d| done.contains(d.as_str())) {
                done.insert(s.id.as_str());
                false
            } else {
                true
            }
        });
        assert!(remaining.len() < before, "dependency cycle among {remaining:?}");
    }
}

/// Asserts exactly one global scope and that every scope id resolves.
pub fn assert_scope_completeness(plan: &Plan) {
    let globals = plan
        .scopes
        .iter()
        .filter(|s| s.kind == ScopeKind::Global)
        .count();
    assert_eq!(globals, 1);
    for step in &plan.steps {
        if let Some(id) = &step.scope_id {
            assert!(plan.scope(id).is_some(), "{} has unknown scope {}", step.id, id);
        }
    }
}

/// `count` lines of plain text.
pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("let line_{i} = {i};"))
        .collect::<Vec<_>>()
        .join("\n")
}
