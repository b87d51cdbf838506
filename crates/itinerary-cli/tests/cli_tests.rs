//! Integration tests for the `itinerary` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive every subcommand
//! through the actual binary, covering stdin/stdout piping, file I/O, settings
//! files and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn itinerary() -> Command {
    let mut cmd = Command::cargo_bin("itinerary").unwrap();
    cmd.env_remove("ITINERARY_CONFIG")
        .env_remove("ITINERARY_DEFAULT_PACE")
        .env_remove("ITINERARY_PRETTY")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: std::process::Output) -> Value {
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

fn place_ids(day: &Value) -> Vec<&str> {
    day.as_array()
        .unwrap()
        .iter()
        .map(|b| b["placeId"].as_str().unwrap())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// autofill
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn autofill_file_to_stdout() {
    let output = itinerary()
        .args(["autofill", "--days", "1", "-i", &fixture("candidates.json")])
        .output()
        .unwrap();

    let plan = stdout_json(output);
    assert_eq!(
        place_ids(&plan["days"][0]),
        ["place-coffee", "place-dinner", "place-museum"]
    );
    assert_eq!(plan["days"][0][0]["startTime"], "08:00:00");
    assert_eq!(plan["days"][0][1]["kind"], "meal");
    assert_eq!(plan["overflow"].as_array().unwrap().len(), 0);
}

#[test]
fn autofill_stdin_with_pace_overflows() {
    let input = r#"[
        {"id": "a", "name": "A", "category": "cafe"},
        {"id": "b", "name": "B", "category": "landmark"},
        {"id": "c", "name": "C", "category": "museum"},
        {"id": "d", "name": "D", "category": "market"},
        {"id": "e", "name": "E", "category": "bar"}
    ]"#;

    let output = itinerary()
        .args(["autofill", "--days", "1", "--pace", "relaxed"])
        .write_stdin(input)
        .output()
        .unwrap();

    let plan = stdout_json(output);
    assert_eq!(place_ids(&plan["days"][0]), ["a", "b", "c"]);
    let overflow: Vec<&str> = plan["overflow"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(overflow, ["d", "e"]);
}

#[test]
fn settings_file_supplies_default_pace() {
    let input = r#"[
        {"id": "a", "name": "A", "category": "cafe"},
        {"id": "b", "name": "B", "category": "landmark"},
        {"id": "c", "name": "C", "category": "museum"},
        {"id": "d", "name": "D", "category": "market"}
    ]"#;

    let output = itinerary()
        .args(["--config", &fixture("relaxed.toml"), "autofill", "--days", "1"])
        .write_stdin(input)
        .output()
        .unwrap();

    assert!(String::from_utf8_lossy(&output.stdout).contains("\n  "));
    let plan = stdout_json(output);
    assert_eq!(plan["days"][0].as_array().unwrap().len(), 3);
}

#[test]
fn pace_flag_overrides_settings() {
    let input = r#"[
        {"id": "a", "name": "A", "category": "cafe"},
        {"id": "b", "name": "B", "category": "landmark"},
        {"id": "c", "name": "C", "category": "museum"},
        {"id": "d", "name": "D", "category": "market"}
    ]"#;

    let output = itinerary()
        .args([
            "--config",
            &fixture("relaxed.toml"),
            "autofill",
            "--days",
            "1",
            "--pace",
            "packed",
        ])
        .write_stdin(input)
        .output()
        .unwrap();

    let plan = stdout_json(output);
    assert_eq!(plan["days"][0].as_array().unwrap().len(), 4);
}

#[test]
fn autofill_writes_output_file() {
    let out = std::env::temp_dir().join(format!("itinerary-plan-{}.json", std::process::id()));
    let out_path = out.to_string_lossy().to_string();

    itinerary()
        .args([
            "autofill",
            "--days",
            "2",
            "-i",
            &fixture("candidates.json"),
            "-o",
            &out_path,
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["days"].as_array().unwrap().len(), 2);
    let _ = std::fs::remove_file(&out);
}

#[test]
fn unknown_pace_is_rejected() {
    itinerary()
        .args(["autofill", "--days", "1", "--pace", "frantic"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pace"));
}

#[test]
fn malformed_candidates_fail_with_context() {
    itinerary()
        .args(["autofill", "--days", "1"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse candidates JSON"));
}

#[test]
fn missing_input_file_fails() {
    itinerary()
        .args(["autofill", "--days", "1", "-i", "/nonexistent/candidates.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// analyze
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn analyze_reports_time_conflict() {
    let output = itinerary()
        .args(["analyze", "-i", &fixture("day.json")])
        .output()
        .unwrap();

    let found = stdout_json(output);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["blockId"], "blk-terraces");
    assert_eq!(found[0]["payload"]["type"], "time_shift");
    assert_eq!(found[0]["payload"]["newStartTime"], "10:30:00");
}

#[test]
fn analyze_empty_day_prints_empty_list() {
    itinerary()
        .arg("analyze")
        .write_stdin(r#"{"id": "d", "dayIndex": 1, "blocks": []}"#)
        .assert()
        .success()
        .stdout("[]\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// reconcile
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reconcile_creates_and_dismisses() {
    let output = itinerary()
        .args(["reconcile", "-i", &fixture("reconcile.json")])
        .output()
        .unwrap();

    let report = stdout_json(output);
    assert_eq!(report["outcome"]["created"], 1);
    assert_eq!(report["outcome"]["dismissed"], 1);

    let suggestions = report["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["id"], "sugg-old");
    assert_eq!(suggestions[0]["status"], "dismissed");
    assert_eq!(suggestions[1]["status"], "pending");
    assert_eq!(suggestions[1]["tripId"], "trip-bali");
    assert_eq!(suggestions[1]["payload"]["newStartTime"], "10:30:00");
}

// ─────────────────────────────────────────────────────────────────────────────
// days
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn days_lists_each_date() {
    let output = itinerary()
        .args(["days", "--arriving", "2026-03-12", "--leaving", "2026-03-15"])
        .output()
        .unwrap();

    let days = stdout_json(output);
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 4);
    assert_eq!(days[0]["dayIndex"], 1);
    assert_eq!(days[0]["date"], "2026-03-12");
    assert_eq!(days[3]["date"], "2026-03-15");
}

#[test]
fn days_rejects_reversed_range() {
    itinerary()
        .args(["days", "--arriving", "2026-03-15", "--leaving", "2026-03-12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}
