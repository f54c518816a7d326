use std::{fs, sync::Arc};

use super::*;
use crate::{
    chunking::InMemoryIndex,
    error::LodestarError,
    models::{AbstractionLevel, Phase, Plan, Scope, ScopeKind, Step, StepCategory, StepStatus},
    params::{ChunkOverrides, ChunkScope, ChunkStep, CompressPlan, CompressionLimits, ValidatePlan},
};

fn sample_plan() -> Plan {
    let step = |id: &str, order: u32| Step {
        id: id.to_string(),
        phase_id: "impl".to_string(),
        abstraction_level: AbstractionLevel::Execution,
        order,
        category: StepCategory::EditCode,
        title: format!("Edit {id}"),
        summary: String::new(),
        scope_id: Some("lib".to_string()),
        dependencies: vec![],
        suggested_tools: vec![],
        status: StepStatus::Todo,
    };
    Plan {
        goal: "Tidy the library".to_string(),
        category: Default::default(),
        phases: vec![Phase {
            id: "impl".to_string(),
            name: "Implement".to_string(),
            abstraction_level: AbstractionLevel::Execution,
            order: 0,
        }],
        scopes: vec![
            Scope::workspace("ws"),
            Scope {
                id: "lib".to_string(),
                kind: ScopeKind::File,
                label: "Library".to_string(),
                selector: "src/lib.rs".to_string(),
            },
        ],
        steps: (0..4).map(|i| step(&format!("s{i}"), i)).collect(),
    }
}

fn planner_with(config: Config) -> Planner {
    let index = InMemoryIndex::new().with_file(
        "src/lib.rs",
        (1..=30).map(|i| format!("// {i}")).collect::<Vec<_>>().join("\n"),
    );
    PlannerBuilder::new()
        .with_config(config)
        .with_index(Arc::new(index))
        .build()
        .unwrap()
}

#[test]
fn test_compress_uses_config_limits() {
    let mut config = Config::default();
    config.compression.max_micro_steps_per_phase = Some(2);
    let planner = planner_with(config);

    let report = planner
        .compress_plan(&CompressPlan {
            plan: sample_plan(),
            limits: CompressionLimits::default(),
        })
        .unwrap();

    assert_eq!(report.stats.steps_merged, 3);
    assert_eq!(report.plan.steps.len(), 1);
}

#[test]
fn test_request_limits_override_config() {
    let mut config = Config::default();
    config.compression.target_max_steps = Some(1);
    let planner = planner_with(config);

    let report = planner
        .compress_plan(&CompressPlan {
            plan: sample_plan(),
            limits: CompressionLimits {
                target_max_steps: Some(3),
                ..Default::default()
            },
        })
        .unwrap();

    assert_eq!(report.plan.steps.len(), 3);
}

#[test]
fn test_validate_plan_handler() {
    let planner = planner_with(Config::default());
    let issues = planner.validate_plan(&ValidatePlan { plan: sample_plan() });
    assert!(issues.is_empty());
}

#[test]
fn test_chunk_handlers_apply_overrides() {
    let planner = planner_with(Config::default());

    let result = planner
        .chunk_scope(&ChunkScope {
            plan: sample_plan(),
            scope_id: "lib".to_string(),
            options: ChunkOverrides {
                max_lines_per_chunk: Some(10),
                apply_dechunking: Some(false),
                ..Default::default()
            },
        })
        .unwrap();
    assert_eq!(result.chunks.len(), 3);

    let result = planner
        .chunk_step(&ChunkStep {
            plan: sample_plan(),
            step_id: "s0".to_string(),
            options: ChunkOverrides::default(),
        })
        .unwrap();
    assert_eq!(result.chunks.len(), 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_chunk_step_unknown_id() {
    let planner = planner_with(Config::default());
    let err = planner
        .chunk_step(&ChunkStep {
            plan: sample_plan(),
            step_id: "missing".to_string(),
            options: ChunkOverrides::default(),
        })
        .unwrap_err();
    assert!(matches!(err, LodestarError::StepNotFound { .. }));
    assert!(err.is_misuse());
}

#[test]
fn test_builder_reads_config_file() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"chunking":{"maxLinesPerChunk":7}}"#).unwrap();

    let planner = PlannerBuilder::new()
        .with_config_path(Some(&path))
        .build()
        .unwrap();

    assert_eq!(planner.config().chunking.max_lines_per_chunk, 7);
    assert!(!planner.has_index());
}

#[test]
fn test_builder_rejects_missing_config_file() {
    let result = PlannerBuilder::new()
        .with_config_path(Some("/definitely/missing/config.json"))
        .build();
    assert!(matches!(result, Err(LodestarError::FileSystem { .. })));
}
