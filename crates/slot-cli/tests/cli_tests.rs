//! Integration tests for the `slots` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to run the `match` and `book`
//! subcommands against a snapshot fixture, over files and stdin.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the snapshot fixture.
fn snapshot_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json")
}

fn snapshot_json() -> String {
    std::fs::read_to_string(snapshot_path()).expect("snapshot.json fixture must exist")
}

fn slots() -> Command {
    Command::cargo_bin("slots").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// match
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn match_lists_labels() {
    // 09:00-10:00 and 09:30-11:00 both overlap inv-1's morning;
    // 14:00-15:00 clashes with m1.
    slots()
        .args(["match", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01"])
        .assert()
        .success()
        .stdout("1. 09:00 - 10:00\n2. 09:30 - 11:00\n");
}

#[test]
fn match_reads_stdin() {
    slots()
        .args(["match", "--with", "inv-1", "--date", "2024-06-01"])
        .write_stdin(snapshot_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00 - 10:00"));
}

#[test]
fn match_warns_about_rejected_slots() {
    slots()
        .args(["match", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipped 2024-06-01 slot 4"));
}

#[test]
fn match_json_output() {
    let output = slots()
        .args([
            "match", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01", "--json",
        ])
        .output()
        .expect("match should run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let slots = value.as_array().expect("top level should be an array");
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["label"], "09:00 - 10:00");
    assert_eq!(slots[0]["duration_minutes"], 60);
    assert_eq!(slots[1]["duration_minutes"], 90);
}

#[test]
fn match_twelve_hour_in_timezone() {
    // Same wall-clock slots read in Berlin; m1 (16:30-17:00 local) no longer clashes.
    slots()
        .args([
            "match",
            "-i",
            snapshot_path(),
            "--with",
            "inv-1",
            "--date",
            "2024-06-01",
            "--tz",
            "Europe/Berlin",
            "--twelve-hour",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("3. 02:00 PM - 03:00 PM"));
}

#[test]
fn match_empty_day() {
    slots()
        .args(["match", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-02"])
        .assert()
        .success()
        .stdout("No common slots for this date\n");
}

#[test]
fn match_with_self_fails() {
    slots()
        .args(["match", "-i", snapshot_path(), "--with", "ent-1", "--date", "2024-06-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yourself"));
}

#[test]
fn match_wrong_token_fails() {
    slots()
        .args([
            "match", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01", "--token",
            "nope",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unauthorized"));
}

#[test]
fn match_bad_date_fails() {
    slots()
        .args(["match", "-i", snapshot_path(), "--with", "inv-1", "--date", "June 1st"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --date"));
}

#[test]
fn match_bad_timezone_fails() {
    slots()
        .args([
            "match", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01", "--tz",
            "Nowhere/Land",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --tz"));
}

#[test]
fn match_invalid_snapshot_fails() {
    slots()
        .args(["match", "--with", "inv-1", "--date", "2024-06-01"])
        .write_stdin("this is not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse snapshot"));
}

#[test]
fn match_missing_file_fails() {
    slots()
        .args([
            "match", "-i", "/nonexistent/snapshot.json", "--with", "inv-1", "--date", "2024-06-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// book
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn book_prints_request_body() {
    let output = slots()
        .args([
            "book", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01", "--pick",
            "2", "--title", "Pitch review",
        ])
        .output()
        .expect("book should run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["participantId"], "inv-1");
    assert_eq!(value["title"], "Pitch review");
    assert_eq!(value["slot"]["start"], "2024-06-01T09:30:00.000Z");
    assert_eq!(value["slot"]["end"], "2024-06-01T11:00:00.000Z");
}

#[test]
fn book_default_title() {
    slots()
        .args([
            "book", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01", "--pick",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Introduction Call"));
}

#[test]
fn book_out_of_range_pick_fails() {
    slots()
        .args([
            "book", "-i", snapshot_path(), "--with", "inv-1", "--date", "2024-06-01", "--pick",
            "5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No slot #5"));
}
