use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Temporary workspace holding a plan, a source tree and an empty XDG
/// config home so a user's own config never leaks into the tests.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        fs::create_dir_all(dir.path().join("xdg")).unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> String {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn root(&self) -> &str {
        self.dir.path().to_str().unwrap()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lodestar").expect("Failed to find lodestar binary");
        cmd.env("XDG_CONFIG_HOME", self.path("xdg"));
        cmd.arg("--no-color");
        cmd
    }
}

const PLAN: &str = r#"{
  "goal": "Tidy the loader",
  "category": "refactor",
  "phases": [
    {"id": "plan", "name": "Plan", "abstractionLevel": "planning", "order": 0},
    {"id": "edit", "name": "Edit", "abstractionLevel": "execution", "order": 1}
  ],
  "scopes": [
    {"id": "ws", "kind": "global", "label": "Workspace", "selector": "*"},
    {"id": "loader", "kind": "file", "label": "Loader", "selector": "src/loader.rs"},
    {"id": "head", "kind": "file", "label": "Head", "selector": "src/loader.rs:1-10"}
  ],
  "steps": [
    {"id": "look", "phaseId": "plan", "abstractionLevel": "planning", "order": 0,
     "category": "scanCode", "title": "Read the loader", "scopeId": "loader"},
    {"id": "e1", "phaseId": "edit", "abstractionLevel": "execution", "order": 1,
     "category": "editCode", "title": "Edit one", "scopeId": "loader", "dependencies": ["look"]},
    {"id": "e2", "phaseId": "edit", "abstractionLevel": "execution", "order": 2,
     "category": "editCode", "title": "Edit two", "scopeId": "loader", "dependencies": ["e1"]},
    {"id": "e3", "phaseId": "edit", "abstractionLevel": "execution", "order": 3,
     "category": "editCode", "title": "Edit three", "scopeId": "loader", "dependencies": ["e2"]}
  ]
}"#;

fn source_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("let value_{i} = {i};\n"))
        .collect()
}

#[test]
fn test_cli_compress_markdown() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    env.cmd()
        .args(["compress", &plan, "--max-micro-steps", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressed plan: 2 → 2 phases, 4 → 2 steps"))
        .stdout(predicate::str::contains("## Changes"));
}

#[test]
fn test_cli_compress_compact() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    env.cmd()
        .args(["compress", &plan, "--format", "compact"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[plan]\ngoal|category\nTidy the loader|refactor\n"))
        .stdout(predicate::str::contains("\n[phases]\n"))
        .stdout(predicate::str::contains("[steps]"))
        .stdout(predicate::str::contains("Compressed plan").not());
}

#[test]
fn test_cli_compress_json() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    let output = env
        .cmd()
        .args(["compress", &plan, "--max-phases", "1", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["phasesAfter"], 1);
    assert_eq!(report["plan"]["steps"].as_array().unwrap().len(), 1);
    assert!(report["compactEncoding"].as_str().unwrap().contains("[scopes]"));
}

#[test]
fn test_cli_compress_writes_output_file() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);
    let out = env.path("compressed.json");

    env.cmd()
        .args(["compress", &plan, "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Success: Wrote compressed plan"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(written["goal"], "Tidy the loader");
}

#[test]
fn test_cli_validate_valid_plan() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    env.cmd()
        .args(["validate", &plan])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan is valid."));
}

#[test]
fn test_cli_validate_reports_issues() {
    let env = TestEnv::new();
    let broken = PLAN.replace(r#""dependencies": ["look"]"#, r#""dependencies": ["ghost"]"#);
    let plan = env.write("plan.json", &broken);

    env.cmd()
        .args(["validate", &plan])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Found 1 issues"))
        .stdout(predicate::str::contains("ghost"))
        .stderr(predicate::str::contains("plan has 1 issues"));
}

#[test]
fn test_cli_chunk_scope_with_root() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);
    env.write("src/loader.rs", &source_lines(30));

    env.cmd()
        .args([
            "chunk",
            "scope",
            &plan,
            "loader",
            "--root",
            env.root(),
            "--max-lines",
            "20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 chunks, 30 lines"))
        .stdout(predicate::str::contains("src/loader.rs lines 1-20 (fileRange)"))
        .stdout(predicate::str::contains("let value_21 = 21;"));
}

#[test]
fn test_cli_chunk_step_json_without_content() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);
    env.write("src/loader.rs", &source_lines(30));

    let output = env
        .cmd()
        .args([
            "chunk",
            "step",
            &plan,
            "e1",
            "--root",
            env.root(),
            "--max-lines",
            "5",
            "--max-chunks",
            "2",
            "--no-content",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let chunks = result["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(result["stats"]["chunksMerged"], 6);
    for chunk in chunks {
        assert_eq!(chunk["kind"], "summary");
        assert!(chunk.get("content").is_none());
        assert_eq!(chunk["metadata"]["mergedFrom"].as_array().unwrap().len(), 3);
    }
}

#[test]
fn test_cli_chunk_without_index_degrades() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    env.cmd()
        .args(["chunk", "scope", &plan, "head"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 chunks, 10 lines"))
        .stdout(predicate::str::contains("No index available"));

    env.cmd()
        .args(["chunk", "scope", &plan, "loader"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No chunks."));
}

#[test]
fn test_cli_chunk_unknown_step_fails() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    env.cmd()
        .args(["chunk", "step", &plan, "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step with ID 'nope' not found"));
}

#[test]
fn test_cli_zero_limit_is_rejected() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);

    env.cmd()
        .args(["chunk", "scope", &plan, "head", "--max-lines", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_lines_per_chunk"));
}

#[test]
fn test_cli_config_file_sets_defaults() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", PLAN);
    env.write("src/loader.rs", &source_lines(30));
    let config = env.write(
        "config.json",
        r#"{"chunking": {"maxLinesPerChunk": 10, "applyDechunking": false}}"#,
    );

    env.cmd()
        .args([
            "--config", &config, "chunk", "scope", &plan, "loader", "--root", env.root(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 chunks, 30 lines"));
}

#[test]
fn test_cli_missing_plan_file() {
    let env = TestEnv::new();
    let missing = env.path("missing.json");

    env.cmd()
        .args(["compress", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read plan file"));
}

#[test]
fn test_cli_invalid_plan_json() {
    let env = TestEnv::new();
    let plan = env.write("plan.json", "{\"goal\": 3}");

    env.cmd()
        .args(["validate", &plan])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid plan file"));
}
