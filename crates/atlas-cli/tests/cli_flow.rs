//! End-to-end tests running the `atlas` binary against a mock backend.

use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn atlas_binary() -> String {
    env!("CARGO_BIN_EXE_atlas").to_string()
}

/// Runs `atlas` with an isolated home directory and the given backend URL.
fn run_atlas(home: &TempDir, api_url: &str, args: &[&str]) -> Output {
    Command::new(atlas_binary())
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("ATLAS_ACCESS_TOKEN")
        .env_remove("ATLAS_SKIP_DUPLICATE_CARRY_OVER")
        .env_remove("RUST_LOG")
        .env("ATLAS_API_URL", api_url)
        .args(args)
        .output()
        .expect("failed to run atlas")
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    let output = run_atlas(&home, "http://localhost:1", &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["habits", "score", "focus", "carry-over"] {
        assert!(stdout.contains(command), "help should mention {command}");
    }
}

#[test]
fn test_invalid_date_is_rejected_before_any_request() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(500);
    });
    let home = TempDir::new().unwrap();

    let output = run_atlas(&home, &server.base_url(), &["score", "--date", "next tuesday"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid date"));
    any.assert_hits(0);
}

#[test]
fn test_carry_over_refuses_past_days() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    let output = run_atlas(
        &home,
        &server.base_url(),
        &["carry-over", "--date", "2020-01-01"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("only applies to today's list"));
}

#[test]
fn test_score_json_against_backend() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/habits/");
        then.status(200).json_body(json!([
            {"id": "h1", "name": "Read", "difficulty": "easy"},
            {"id": "h2", "name": "Run", "difficulty": "hard"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/habits/logs/2025-01-15");
        then.status(200).json_body(json!([
            {"id": "l1", "habit_id": "h1", "date": "2025-01-15", "completed": true},
            {"id": "l2", "habit_id": "h2", "date": "2025-01-15", "completed": true}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/todos/2025-01-15");
        then.status(200).json_body(json!([
            {"id": "t1", "content": "Pay rent", "date": "2025-01-15", "priority": "high", "is_completed": true}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/learning/2025-01-15");
        then.status(200).json_body(json!([
            {"id": "s1", "date": "2025-01-15", "duration_minutes": 90, "subject": "Go"}
        ]));
    });
    let home = TempDir::new().unwrap();

    let output = run_atlas(
        &home,
        &server.base_url(),
        &["score", "--date", "2025-01-15", "--json"],
    );

    assert!(
        output.status.success(),
        "score should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["date"], "2025-01-15");
    assert_eq!(value["value"], 100);
    assert_eq!(value["grade"], "S");
}

#[test]
fn test_backend_errors_surface_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/learning/range");
        then.status(401)
            .json_body(json!({"detail": "Could not validate credentials"}));
    });
    let home = TempDir::new().unwrap();

    let output = run_atlas(&home, &server.base_url(), &["focus", "--days", "3"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load learning sessions"));
    assert!(stderr.contains("Could not validate credentials"));
}
