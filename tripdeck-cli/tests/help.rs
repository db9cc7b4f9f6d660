use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::{self};
use predicates::str::contains;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tripdeck-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("tripdeck"))
        .stdout(contains("--input"));
}

#[test]
fn missing_input_file_is_reported() {
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.args(["--check", "-i", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(contains("failed to read file"));
}

#[test]
fn schema_violations_are_listed() {
    let path = scratch_file(
        "invalid.json",
        r#"{"points":[{"type":"taxi","dateFrom":"2024-03-18T10:30:00Z",
            "dateTo":"2024-03-18T11:00:00Z","basePrice":"twenty"}]}"#,
    );
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.arg("--check")
        .arg("-i")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("itinerary document is invalid"))
        .stderr(contains("/points/0/basePrice"));
}

#[test]
fn check_echoes_a_valid_document() {
    let path = scratch_file(
        "valid.json",
        r#"{"points":[{"id":"7","type":"bus","destination":1,
            "dateFrom":"2024-03-18T10:30:00Z","dateTo":"2024-03-18T11:00:00Z",
            "basePrice":12,"offers":[]}]}"#,
    );
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.arg("--check")
        .arg("--no-pretty")
        .arg("-i")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains(r#""id":"7""#))
        .stdout(contains(r#""basePrice":12"#));
}

#[test]
fn refuses_to_overwrite_without_force() {
    let existing = scratch_file("existing.json", "{}");
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.arg("--check")
        .arg("-o")
        .arg(&existing)
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn prints_the_document_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.arg("--print-schema")
        .assert()
        .success()
        .stdout(contains("ItineraryDocument"))
        .stdout(contains("basePrice"));
}

#[test]
fn unrenderable_date_format_is_refused() {
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.args(["--check", "--date-format", "%Q"])
        .assert()
        .failure()
        .stderr(contains("invalid date format"));
}

#[test]
fn repeated_point_ids_are_refused() {
    let point = r#"{"id":"1","type":"bus","dateFrom":"2024-03-18T10:30:00Z",
        "dateTo":"2024-03-18T11:00:00Z","basePrice":12}"#;
    let path = scratch_file("repeated.json", &format!(r#"{{"points":[{point},{point}]}}"#));
    let mut cmd = cargo::cargo_bin_cmd!("tripdeck");
    cmd.arg("--check")
        .arg("-i")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("/points/1: duplicate id"));
}
