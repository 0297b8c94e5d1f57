//! Binary tests for the `modvet` command line.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// `modvet` run from an empty directory with no ambient configuration.
#[allow(deprecated)]
fn modvet_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modvet").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MODVET_CONFIG")
        .env_remove("MODVET_GO")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_rules_lists_every_code() {
    let tmp = TempDir::new().unwrap();
    let mut assert = modvet_cmd(&tmp).arg("rules").assert().success();
    for code in ["MV001", "MV002", "MV003", "MV004", "MV005", "MV006", "MV007", "MV008"] {
        assert = assert.stdout(predicate::str::contains(code));
    }
}

#[test]
fn test_init_writes_config_once() {
    let tmp = TempDir::new().unwrap();

    modvet_cmd(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created example configuration"));
    let written = fs::read_to_string(tmp.path().join("modvet.yaml")).unwrap();
    assert!(written.contains("checks:"));

    modvet_cmd(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_validate_accepts_example_config() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp).arg("init").assert().success();

    modvet_cmd(&tmp)
        .args(["validate", "modvet.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_validate_rejects_bad_severity() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.yaml"),
        "policies:\n  severity_overrides:\n    MV004: fatal\n",
    )
    .unwrap();

    modvet_cmd(&tmp)
        .args(["validate", "bad.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("fatal"));
}

#[test]
fn test_check_clean_fixture_passes() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--no-color", "--fixture"])
        .arg(fixture("clean.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED - No issues found"));
}

#[test]
fn test_check_flagged_fixture_exits_one() {
    let tmp = TempDir::new().unwrap();
    let output = modvet_cmd(&tmp)
        .args(["check", "--format", "json", "--fixture"])
        .arg(fixture("flagged.json"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["summary"]["flagged"], true);
    assert_eq!(
        parsed["summary"]["flagged_rules"],
        serde_json::json!(["MV004", "MV006", "MV007", "MV008"])
    );
}

#[test]
fn test_check_skip_removes_rule() {
    let tmp = TempDir::new().unwrap();
    let output = modvet_cmd(&tmp)
        .args(["check", "--format", "json", "--skip", "replace", "--skip", "pseudo-version"])
        .arg("--fixture")
        .arg(fixture("flagged.json"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["summary"]["rules_run"], 6);
    assert_eq!(parsed["summary"]["flagged_rules"], serde_json::json!(["MV004", "MV006"]));
}

#[test]
fn test_check_writes_output_file() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--no-color", "--output", "report.txt", "--fixture"])
        .arg(fixture("clean.json"))
        .assert()
        .success();

    let report = fs::read_to_string(tmp.path().join("report.txt")).unwrap();
    assert!(report.contains("modvet Report"));
}

#[test]
fn test_check_stale_reports_then_fails() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--no-color", "--fixture"])
        .arg(fixture("stale.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("MV001"))
        .stdout(predicate::str::contains("FAILED - Flagged by MV001"))
        .stderr(predicate::str::contains("would be updated"));
}

#[test]
fn test_check_aborted_pass_is_not_passed() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--no-color", "--fixture"])
        .arg(fixture("aborted.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ABORTED: excluded-version: resolution failed"))
        .stdout(predicate::str::contains("PASSED").not())
        .stderr(predicate::str::contains("configured to fail"));

    let output = modvet_cmd(&tmp)
        .args(["check", "--format", "json", "--fixture"])
        .arg(fixture("aborted.json"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["summary"]["aborted"], true);
    assert_eq!(parsed["summary"]["flagged"], false);
    // MV001 to MV004 ran before the manifest read failed.
    assert_eq!(parsed["summary"]["rules_run"], 4);
}

#[test]
fn test_check_outside_module() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--fixture"])
        .arg(fixture("outside.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no current 'go.mod' file"));
}

#[test]
fn test_check_missing_toolchain() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--go", "/nonexistent/modvet-test/go"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is unavailable"));
}

#[test]
fn test_check_rejects_unknown_rule() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["check", "--skip", "no-such-rule"])
        .assert()
        .code(2);
}

#[test]
fn test_graph_from_fixture() {
    let tmp = TempDir::new().unwrap();
    modvet_cmd(&tmp)
        .args(["graph", "--format", "mermaid", "--fixture"])
        .arg(fixture("clean.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph LR"))
        .stdout(predicate::str::contains("rsc_io_quote_v1_5_2"));
}
