//! ---
//! cbs_section: "05-external-interfaces"
//! cbs_subsection: "tests"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Command line tests for cbsctl."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

fn cbsctl() -> Command {
    let mut cmd = Command::cargo_bin("cbsctl").unwrap();
    cmd.env_remove("CBS_CONFIG");
    cmd
}

#[test]
fn lists_iec_ratings() {
    let output = cbsctl()
        .args(["ratings", "--standard", "iec"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("IEC standard breaker ratings"));
    assert!(stdout.contains("6, 10, 13, 16"));
}

#[test]
fn ratings_as_json() {
    let output = cbsctl()
        .args(["ratings", "--standard", "nec", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["standard"], "NEC");
    assert_eq!(value["ratingsAmps"][0], 15);
}

#[test]
fn trip_curve_advice_for_motor() {
    let output = cbsctl()
        .args(["trip-curve", "--standard", "iec", "--load-type", "inductive"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(output).unwrap().contains("Type D"));
}

#[test]
fn calc_prints_results_and_writes_report() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("circuit.json");
    fs::write(
        &input,
        r#"{
            "circuit": {
                "standard": "NEC",
                "voltage": 240,
                "phase": "single",
                "loadMode": "kw",
                "loadValue": 10,
                "powerFactor": 0.9
            },
            "label": "kitchen-range"
        }"#,
    )
    .unwrap();
    let reports = dir.path().join("reports");

    let output = cbsctl()
        .arg("calc")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&reports)
        .arg("--log-dir")
        .arg(dir.path().join("logs"))
        .env("CBS_LOG", "debug")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // Debug logging is on, yet stdout holds nothing but the results document.
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["breakerSizing"]["recommendedRatingAmps"], 60);
    assert!(reports.join("breaker_sizing.json").is_file());
}

#[test]
fn calc_fails_when_capacity_is_exceeded() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("feeder.yaml");
    fs::write(
        &input,
        "circuit:\n  standard: NEC\n  voltage: 480\n  phase: three\n  loadMode: amps\n  loadValue: 4000\n  powerFactor: 0.9\n",
    )
    .unwrap();

    let output = cbsctl()
        .arg("calc")
        .arg("--input")
        .arg(&input)
        .arg("--log-dir")
        .arg(dir.path().join("logs"))
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8(output).unwrap().contains("BREAKER_CAPACITY_EXCEEDED"));
}
