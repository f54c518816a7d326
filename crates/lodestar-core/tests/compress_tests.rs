mod common;

use common::{
    assert_dependency_integrity, assert_scope_completeness, bugfix_plan, five_phase_plan, phase,
    step,
};
use lodestar_core::{
    compress::{compress, validate_plan},
    models::{AbstractionLevel, Change, Plan, Scope, StepCategory, TaskCategory},
    CompactPlan, CompressionLimits,
};

fn limits(phases: Option<usize>, steps: Option<usize>, micro: Option<usize>) -> CompressionLimits {
    CompressionLimits {
        target_max_phases: phases,
        target_max_steps: steps,
        max_micro_steps_per_phase: micro,
    }
}

#[test]
fn test_repairs_without_limits() {
    let input = bugfix_plan();
    let report = compress(&input, &CompressionLimits::default()).unwrap();

    assert_eq!(report.stats.level_corrections, 4);
    assert_eq!(report.stats.scope_reassignments, 1);
    assert_eq!(report.stats.steps_before, report.stats.steps_after);
    assert!(report
        .changes
        .iter()
        .any(|c| matches!(c, Change::ScopeSynthesized { .. })));

    let refine = report.plan.step("refine").unwrap();
    assert_eq!(refine.abstraction_level, AbstractionLevel::Execution);
    assert_scope_completeness(&report.plan);
    assert_dependency_integrity(&report.plan);
    assert!(validate_plan(&report.plan).is_empty());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn test_input_is_not_mutated() {
    let input = bugfix_plan();
    let snapshot = input.clone();
    let _ = compress(&input, &limits(Some(2), Some(1), Some(1))).unwrap();
    assert_eq!(input, snapshot);
}

#[test]
fn test_micro_steps_are_merged() {
    let report = compress(&bugfix_plan(), &limits(None, None, Some(2))).unwrap();

    assert_eq!(report.stats.steps_merged, 5);
    let merged = report.plan.step("edit0").unwrap();
    assert_eq!(merged.dependencies, vec!["design".to_string()]);
    assert_eq!(merged.suggested_tools, vec!["edit_file".to_string()]);
    assert!(merged.summary.contains("Work for edit5"));

    let tests = report.plan.step("tests").unwrap();
    assert_eq!(tests.dependencies, vec!["edit0".to_string()]);
    assert_dependency_integrity(&report.plan);
}

#[test]
fn test_truncation_keeps_first_phases() {
    let report = compress(&five_phase_plan(), &limits(Some(2), None, None)).unwrap();

    let phase_ids: Vec<&str> = report.plan.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(phase_ids, vec!["p1", "p2"]);
    assert!(report
        .plan
        .steps
        .iter()
        .all(|s| s.phase_id == "p1" || s.phase_id == "p2"));
    assert_eq!(report.stats.phases_dropped, 3);
    assert_eq!(report.stats.steps_dropped, 6);
    assert_dependency_integrity(&report.plan);
}

#[test]
fn test_per_phase_step_limit() {
    let report = compress(&five_phase_plan(), &limits(None, Some(1), None)).unwrap();
    assert_eq!(report.plan.steps.len(), 5);
    assert!(report.plan.steps.iter().all(|s| s.id.ends_with("-0")));
}

#[test]
fn test_safety_net_restores_a_step() {
    let mut input = five_phase_plan();
    // first phase by order has no steps
    input.phases.push(common::phase("p0", AbstractionLevel::Planning, 0));

    let report = compress(&input, &limits(Some(1), None, None)).unwrap();

    assert_eq!(report.plan.steps.len(), 1);
    let restored = &report.plan.steps[0];
    assert_eq!(restored.id, "s1-0");
    assert_eq!(restored.phase_id, "p0");
    assert!(restored.dependencies.is_empty());
    assert!(report
        .changes
        .iter()
        .any(|c| matches!(c, Change::StepRestored { step_id } if step_id == "s1-0")));
    assert!(report.warnings.iter().any(|w| w.contains("restored")));
}

#[test]
fn test_cycles_are_broken() {
    let mut input = five_phase_plan();
    input.steps[0].dependencies = vec!["s5-0".to_string()];

    let report = compress(&input, &CompressionLimits::default()).unwrap();

    assert_dependency_integrity(&report.plan);
    assert!(report.changes.iter().any(|c| matches!(
        c,
        Change::DependencyRemoved { reason, .. } if reason.starts_with("closes cycle")
    )));
}

#[test]
fn test_merge_keeps_original_edge_over_inherited_one() {
    let input = Plan {
        goal: "Edit, test, edit again".to_string(),
        category: TaskCategory::Bugfix,
        phases: vec![phase("p1", AbstractionLevel::Execution, 0)],
        scopes: vec![Scope::workspace("ws")],
        steps: vec![
            step("a", "p1", StepCategory::EditCode, 0, &[]),
            step("t", "p1", StepCategory::RunTests, 1, &["a"]),
            step("c", "p1", StepCategory::EditCode, 2, &["t"]),
        ],
    };

    let report = compress(&input, &limits(None, None, Some(1))).unwrap();

    assert_dependency_integrity(&report.plan);
    let tests = report.plan.steps.iter().find(|s| s.id == "t").unwrap();
    assert_eq!(tests.dependencies, vec!["a".to_string()]);
    let merged = report.plan.steps.iter().find(|s| s.id == "a").unwrap();
    assert!(!merged.depends_on("t"));
    assert!(!report.warnings.iter().any(|w| w.contains("break cycles")));
}

#[test]
fn test_dangling_and_self_dependencies_are_stripped() {
    let mut input = five_phase_plan();
    input.steps[3].dependencies.push("ghost".to_string());
    let own_id = input.steps[4].id.clone();
    input.steps[4].dependencies.push(own_id);

    let report = compress(&input, &CompressionLimits::default()).unwrap();
    assert_dependency_integrity(&report.plan);
}

#[test]
fn test_level_policy_is_idempotent() {
    let first = compress(&bugfix_plan(), &CompressionLimits::default()).unwrap();
    let second = compress(&first.plan, &CompressionLimits::default()).unwrap();

    assert_eq!(first.plan, second.plan);
    assert_eq!(second.stats.level_corrections, 0);
    assert!(second.changes.is_empty());
}

#[test]
fn test_compression_is_deterministic() {
    let a = compress(&bugfix_plan(), &limits(Some(3), Some(2), Some(2))).unwrap();
    let b = compress(&bugfix_plan(), &limits(Some(3), Some(2), Some(2))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_zero_limits_are_clamped() {
    let report = compress(&five_phase_plan(), &limits(Some(0), Some(0), Some(0))).unwrap();

    assert_eq!(report.plan.phases.len(), 1);
    assert_eq!(report.plan.steps.len(), 1);
    assert_eq!(
        report
            .warnings
            .iter()
            .filter(|w| w.contains("treated as 1"))
            .count(),
        3
    );
}

#[test]
fn test_plan_without_steps_is_unchanged() {
    let mut input = five_phase_plan();
    input.steps.clear();

    let report = compress(&input, &limits(Some(1), None, None)).unwrap();

    assert_eq!(report.plan, input);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.changes.is_empty());
}

#[test]
fn test_phaseless_plan_gets_a_phase() {
    let mut input = five_phase_plan();
    input.phases.clear();
    input.steps.truncate(2);

    let report = compress(&input, &CompressionLimits::default()).unwrap();

    assert_eq!(report.plan.phases.len(), 1);
    assert!(report
        .plan
        .steps
        .iter()
        .all(|s| s.phase_id == report.plan.phases[0].id));
    assert!(validate_plan(&report.plan).is_empty());
}

#[test]
fn test_compact_encoding_matches_plan() {
    let mut input = five_phase_plan();
    input.steps.push({
        let mut s = step("odd", "p1", StepCategory::EditCode, 99, &[]);
        s.title = "Handle a|b\nnewline".to_string();
        s
    });

    let report = compress(&input, &CompressionLimits::default()).unwrap();

    assert_eq!(report.compact_encoding, CompactPlan(&report.plan).to_string());
    assert!(report.compact_encoding.contains("Handle a\\|b\\nnewline"));
    let step_rows = report
        .compact_encoding
        .lines()
        .skip_while(|l| *l != "[steps]")
        .skip(2)
        .count();
    assert_eq!(step_rows, report.plan.steps.len());
}
