mod common;

use common::cli::{Workspace, run_compare, run_compare_with_env};
use assert_cmd::Command;
use common::fixtures::{TopReport, baseline_report, candidate_report};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

fn write_pair(workspace: &Workspace) -> (String, String) {
    let old = workspace.write("old.txt", &baseline_report().render());
    let new = workspace.write("new.txt", &candidate_report().render());
    (old.display().to_string(), new.display().to_string())
}

#[test]
fn e2e_text_report_sections() {
    let _log = common::test_log("e2e_text_report_sections");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);

    let run = run_compare(&workspace, [&old, &new]);
    assert!(run.status.success(), "compare failed: {}", run.stderr);

    let out = &run.stdout;
    assert!(out.starts_with(&"=".repeat(80)));
    assert!(out.contains("PPROF BENCHMARK COMPARISON"));
    assert!(out.contains(&format!("Old profile: {old}\n")));
    assert!(out.contains("Old duration: 30.0s\n"));
    assert!(out.contains("Total sample delta: 2,500ms (+25%)\n"));
    assert!(out.contains("Common functions compared: 5\n"));
    assert!(out.contains("Excluded by patterns: 0\n"));
    assert!(out.contains("Regression threshold: >30% and >50ms delta\n"));
    assert!(out.contains("Regressions found: 2\n"));
    assert!(out.contains("Improvements found: 2\n"));
    assert!(out.contains("Stable: 1\n"));

    assert!(out.contains("REGRESSIONS: YOUR_CODE (sorted by cumulative delta)"));
    let find_path = out.find("  vector.FindPath").expect("FindPath row");
    let update = out.find("  world.(*Map).Update").expect("Update row");
    assert!(find_path < update, "largest delta first");

    let ecs = out.find("  [ENTITY_FRAMEWORK]").expect("ecs subsection");
    let runtime = out.find("  [RUNTIME]").expect("runtime subsection");
    assert!(ecs < runtime);

    assert!(out.contains("NEW FUNCTIONS (not in old profile, cum > 200ms)"));
    assert!(out.contains("main.addedHelper"));
    assert!(out.contains("REMOVED FUNCTIONS (in old profile only, cum > 200ms)"));
    assert!(out.contains("main.removedHelper"));
    assert!(out.trim_end().ends_with(&"=".repeat(80)));

    assert!(run.stderr.contains(&format!("Extracting profile: {old} ...")));
    assert!(run.stderr.contains(&format!("Extracting profile: {new} ...")));
}

#[test]
fn e2e_quiet_suppresses_progress() {
    let _log = common::test_log("e2e_quiet_suppresses_progress");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);

    let run = run_compare(&workspace, [old.as_str(), new.as_str(), "--quiet"]);
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(!run.stderr.contains("Extracting profile"));
    assert!(run.stdout.contains("PPROF BENCHMARK COMPARISON"));
}

#[test]
fn e2e_exclude_patterns() {
    let _log = common::test_log("e2e_exclude_patterns");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);

    let run = run_compare(
        &workspace,
        [
            old.as_str(),
            new.as_str(),
            "--exclude",
            "vector\\..*Path",
            "--exclude",
            "Helper$",
        ],
    );
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.contains("Common functions compared: 4\n"));
    assert!(run.stdout.contains("Excluded by patterns: 1\n"));
    assert!(run.stdout.contains("Regressions found: 1\n"));
    assert!(!run.stdout.contains("FindPath"));
    assert!(!run.stdout.contains("NEW FUNCTIONS"));
    assert!(!run.stdout.contains("REMOVED FUNCTIONS"));
}

#[test]
fn e2e_json_output() {
    let _log = common::test_log("e2e_json_output");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);

    let run = run_compare(&workspace, [old.as_str(), new.as_str(), "--json"]);
    assert!(run.status.success(), "compare failed: {}", run.stderr);

    let json: Value = serde_json::from_str(&run.stdout).expect("valid json");
    assert_eq!(json["old"]["profile"], old.as_str());
    assert_eq!(json["old"]["total_sampled_ms"], 10_000.0);
    assert_eq!(json["thresholds"]["threshold_pct"], 30.0);
    assert_eq!(json["thresholds"]["significance_floor_ms"], 200.0);

    let regressions = json["result"]["regressions"].as_array().expect("array");
    assert_eq!(regressions.len(), 2);
    assert_eq!(regressions[0]["name"], "game_main/vector.FindPath");
    assert_eq!(regressions[0]["category"], "YOUR_CODE");
    assert_eq!(regressions[0]["inclusive_delta_ms"], 600.0);

    assert_eq!(json["result"]["new_only"][0]["name"], "main.addedHelper");
    assert_eq!(json["result"]["removed_only"][0]["name"], "main.removedHelper");
    assert_eq!(json["result"]["common_count"], 5);
}

#[test]
fn e2e_output_file() {
    let _log = common::test_log("e2e_output_file");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);
    let report_path = workspace.root.join("report.txt");

    let run = run_compare(
        &workspace,
        [
            old.as_str(),
            new.as_str(),
            "--output",
            report_path.to_str().expect("utf-8 path"),
        ],
    );
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.is_empty());
    assert!(run.stderr.contains("Results written to"));

    let written = fs::read_to_string(&report_path).expect("report file");
    assert!(written.contains("PPROF BENCHMARK COMPARISON"));
    assert!(written.contains("Regressions found: 2"));
}

#[test]
fn e2e_output_to_missing_directory_names_the_file() {
    let _log = common::test_log("e2e_output_to_missing_directory_names_the_file");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);
    let report_path = workspace.root.join("no").join("such").join("dir").join("report.txt");
    let report_arg = report_path.to_str().expect("utf-8 path");

    let run = run_compare(&workspace, [old.as_str(), new.as_str(), "--output", report_arg]);
    assert_eq!(run.code(), Some(5), "stderr: {}", run.stderr);
    assert!(run.stderr.contains(report_arg), "stderr: {}", run.stderr);
    assert!(!run.stderr.contains("Results written to"));
    assert!(!report_path.exists());
}

#[test]
fn e2e_log_file_is_json_lines() {
    let _log = common::test_log("e2e_log_file_is_json_lines");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);
    let log_path = workspace.root.join("compare.log");

    let run = run_compare(
        &workspace,
        [
            old.as_str(),
            new.as_str(),
            "-v",
            "--log-file",
            log_path.to_str().expect("utf-8 path"),
        ],
    );
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.contains("PPROF BENCHMARK COMPARISON"));

    let contents = fs::read_to_string(&log_path).expect("log file");
    let events: Vec<Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("json log line"))
        .collect();
    assert!(
        events
            .iter()
            .any(|event| event["fields"]["message"] == "Loaded cost table"),
        "log: {contents}"
    );
}

#[test]
fn e2e_top_limits_rows() {
    let _log = common::test_log("e2e_top_limits_rows");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);

    let run = run_compare(&workspace, [old.as_str(), new.as_str(), "--top", "1"]);
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.contains("Regressions found: 2\n"));
    assert!(run.stdout.contains("vector.FindPath"));
    assert!(!run.stdout.contains("world.(*Map).Update"));
}

#[test]
fn e2e_missing_header_and_empty_intersection() {
    let _log = common::test_log("e2e_missing_header_and_empty_intersection");
    let workspace = Workspace::new();
    let old = workspace.write("a.txt", &TopReport::new().row("main.a", 1.0, 2.0).render());
    let new = workspace.write("b.txt", &TopReport::new().row("main.b", 1.0, 2.0).render());

    let run = run_compare(&workspace, [&old, &new]);
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(!run.stdout.contains("duration"));
    assert!(!run.stdout.contains("total samples"));
    assert!(run.stdout.contains("Common functions compared: 0\n"));
    assert!(run.stdout.contains("Regressions found: 0\n"));
}

#[test]
fn e2e_project_config_and_precedence() {
    let _log = common::test_log("e2e_project_config_and_precedence");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);
    workspace.write(".pprof-compare.yaml", "threshold: 250\nexclude:\n  - steady\n");

    let from_file = run_compare(&workspace, [old.as_str(), new.as_str()]);
    assert!(from_file.status.success(), "compare failed: {}", from_file.stderr);
    assert!(from_file.stdout.contains("Regression threshold: >250% and >50ms delta"));
    assert!(from_file.stdout.contains("Regressions found: 0\n"));
    assert!(from_file.stdout.contains("Excluded by patterns: 1\n"));

    let from_env = run_compare_with_env(
        &workspace,
        [old.as_str(), new.as_str()],
        [("PPROF_COMPARE_THRESHOLD", "100")],
    );
    assert!(from_env.status.success(), "compare failed: {}", from_env.stderr);
    assert!(from_env.stdout.contains("Regression threshold: >100% and >50ms delta"));
    assert!(from_env.stdout.contains("Regressions found: 1\n"));

    let from_cli = run_compare_with_env(
        &workspace,
        [old.as_str(), new.as_str(), "--threshold", "30"],
        [("PPROF_COMPARE_THRESHOLD", "100")],
    );
    assert!(from_cli.status.success(), "compare failed: {}", from_cli.stderr);
    assert!(from_cli.stdout.contains("Regressions found: 2\n"));
}

#[test]
fn e2e_explicit_config_path() {
    let _log = common::test_log("e2e_explicit_config_path");
    let workspace = Workspace::new();
    let (old, new) = write_pair(&workspace);
    let config = workspace.write("ci.yaml", "min-delta: 1000\n");

    let run = run_compare(
        &workspace,
        [
            old.as_str(),
            new.as_str(),
            "--config",
            config.to_str().expect("utf-8 path"),
        ],
    );
    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.contains("Regressions found: 0\n"));
    assert!(run.stdout.contains("Improvements found: 0\n"));
}

#[test]
fn e2e_help_lists_options() {
    let _log = common::test_log("e2e_help_lists_options");
    Command::new(assert_cmd::cargo::cargo_bin!("pprof-compare"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--min-delta"))
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("--input-format"));
}

#[test]
fn e2e_requires_two_profiles() {
    let _log = common::test_log("e2e_requires_two_profiles");
    Command::new(assert_cmd::cargo::cargo_bin!("pprof-compare"))
        .arg("only-one.prof")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NEW_PROFILE"));
}
