//! E2E tests for the review surface: diff, issues, edit, and the guard
//! rails on approve/watch/download, driven from a session file written
//! directly by the test (no backend involved).

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn est_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("est"));
    cmd.current_dir(dir);
    cmd.env("ESTIMA_LOG", "error");
    cmd
}

/// Write `.estima/session.json` the way a completed review gate would have
/// left it: a reconciled sheet, the suggestion snapshot, and extraction data
/// with flagged requirement issues.
fn write_review_session(dir: &Path) {
    let session = json!({
        "workflow_id": "cp-brief.docx-4821",
        "status": "WAITING_FOR_HUMAN",
        "extracted": {
            "client_name": "Acme",
            "project_essence": "Customer portal",
            "business_goals": "Reduce churn",
            "key_features": "SSO login\nAnalytics dashboard\nCSV export",
            "tech_stack": "React, FastAPI",
            "requirement_issues": [
                {
                    "type": "ambiguity",
                    "field": "key_features",
                    "category": "auth",
                    "item_text": "sso login",
                    "source": "brief p.2",
                    "reason": "identity provider not named"
                },
                {
                    "type": "gap",
                    "field": "key_features",
                    "category": "reporting",
                    "item_text": "PDF invoices",
                    "source": "call notes",
                    "reason": "not in the brief at all"
                }
            ]
        },
        "sheet": {
            "rates": [
                {"name": "Backend", "rate": 300000},
                {"name": "Frontend", "rate": 300000}
            ],
            "stages": ["Прототип", "Разработка"],
            "hours": {
                "Прототип": {"Backend": 8, "Frontend": 12},
                "Разработка": {"Backend": 40, "Frontend": 30}
            },
            "modified": {},
            "risk": {}
        },
        "suggested": {
            "stages": ["Прототип", "Разработка"],
            "roles": ["Backend", "Frontend"],
            "hours": {
                "Прототип": {"Backend": 8, "Frontend": 12},
                "Разработка": {"Backend": 40, "Frontend": 30}
            }
        }
    });

    std::fs::create_dir_all(dir.join(".estima")).expect("mkdir");
    std::fs::write(
        dir.join(".estima/session.json"),
        serde_json::to_string_pretty(&session).expect("encode"),
    )
    .expect("write session");
}

fn diff_json(dir: &Path) -> Value {
    let output = est_cmd(dir)
        .args(["diff", "--json"])
        .output()
        .expect("diff should not crash");
    assert!(
        output.status.success(),
        "diff failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("diff --json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

#[test]
fn diff_is_empty_right_after_reconciliation() {
    let dir = TempDir::new().expect("tempdir");
    write_review_session(dir.path());

    let report = diff_json(dir.path());
    assert_eq!(report["deltas"].as_array().expect("array").len(), 0);
}

#[test]
fn diff_reports_signed_deltas_after_edits() {
    let dir = TempDir::new().expect("tempdir");
    write_review_session(dir.path());

    est_cmd(dir.path())
        .args(["hours", "Разработка", "Backend", "50"])
        .assert()
        .success();
    est_cmd(dir.path())
        .args(["hours", "Прототип", "Frontend", "10"])
        .assert()
        .success();

    let report = diff_json(dir.path());
    let deltas = report["deltas"].as_array().expect("array");
    assert_eq!(deltas.len(), 2);
    // Stage order, then role order.
    assert_eq!(deltas[0]["stage"], "Прототип");
    assert_eq!(deltas[0]["delta"], -2);
    assert_eq!(deltas[1]["stage"], "Разработка");
    assert_eq!(deltas[1]["delta"], 10);
}

#[test]
fn diff_without_suggestion_fails() {
    let dir = TempDir::new().expect("tempdir");
    est_cmd(dir.path())
        .args(["diff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

// ---------------------------------------------------------------------------
// issues
// ---------------------------------------------------------------------------

#[test]
fn issues_anchor_to_feature_lines() {
    let dir = TempDir::new().expect("tempdir");
    write_review_session(dir.path());

    let output = est_cmd(dir.path())
        .args(["issues", "--json"])
        .output()
        .expect("issues should not crash");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let issues = report["issues"].as_array().expect("array");
    assert_eq!(issues.len(), 2);

    // "sso login" matches "SSO login" exactly, case-folded: line 1.
    assert_eq!(issues[0]["matched_line"], 0);
    // "PDF invoices" matches nothing.
    assert!(issues[1]["matched_line"].is_null());
}

#[test]
fn issues_unmatched_filter() {
    let dir = TempDir::new().expect("tempdir");
    write_review_session(dir.path());

    let output = est_cmd(dir.path())
        .args(["issues", "--unmatched", "--json"])
        .output()
        .expect("issues should not crash");
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let issues = report["issues"].as_array().expect("array");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["item_text"], "PDF invoices");
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

#[test]
fn edit_rewrites_field_in_session() {
    let dir = TempDir::new().expect("tempdir");
    write_review_session(dir.path());

    est_cmd(dir.path())
        .args(["edit", "client-name", "Acme GmbH"])
        .assert()
        .success();

    let content =
        std::fs::read_to_string(dir.path().join(".estima/session.json")).expect("readable");
    let session: Value = serde_json::from_str(&content).expect("valid JSON");
    assert_eq!(session["extracted"]["client_name"], "Acme GmbH");
    // Passthrough extras survive the edit.
    assert!(session["extracted"]["requirement_issues"].is_array());
}

#[test]
fn edit_without_extraction_fails() {
    let dir = TempDir::new().expect("tempdir");
    est_cmd(dir.path())
        .args(["edit", "client-name", "Acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

// ---------------------------------------------------------------------------
// guard rails on networked commands
// ---------------------------------------------------------------------------

#[test]
fn approve_requires_review_gate() {
    let dir = TempDir::new().expect("tempdir");
    write_review_session(dir.path());

    // Flip the cached status to something that is not the gate.
    let path = dir.path().join(".estima/session.json");
    let content = std::fs::read_to_string(&path).expect("readable");
    let mut session: Value = serde_json::from_str(&content).expect("valid JSON");
    session["status"] = json!("PROCESSING");
    std::fs::write(&path, serde_json::to_string(&session).expect("encode")).expect("write");

    est_cmd(dir.path())
        .args(["approve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn watch_without_workflow_fails() {
    let dir = TempDir::new().expect("tempdir");
    est_cmd(dir.path())
        .args(["watch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn status_without_workflow_fails() {
    let dir = TempDir::new().expect("tempdir");
    est_cmd(dir.path())
        .args(["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn download_without_proposal_fails() {
    let dir = TempDir::new().expect("tempdir");
    est_cmd(dir.path())
        .args(["download"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("proposal"));
}

#[test]
fn corrupt_session_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".estima")).expect("mkdir");
    std::fs::write(dir.path().join(".estima/session.json"), "{not json").expect("write");

    est_cmd(dir.path())
        .args(["show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session.json"));
}
