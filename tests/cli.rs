//! Argument-validation behavior of the four binaries. These paths must fail
//! before any engine interaction, so they run without a memory image or the
//! native vmm library.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn dump_without_positionals_exits_one() -> TestResult {
    let mut cmd = Command::cargo_bin("dump_process_memory")?;
    cmd.assert().failure().code(1);
    Ok(())
}

#[test]
fn dump_with_only_a_process_exits_one() -> TestResult {
    let mut cmd = Command::cargo_bin("dump_process_memory")?;
    cmd.arg("lsass.exe");
    cmd.assert().failure().code(1);
    Ok(())
}

#[test]
fn dump_without_backend_args_names_the_requirement() -> TestResult {
    let mut cmd = Command::cargo_bin("dump_process_memory")?;
    cmd.args(["lsass.exe", "lsass.dmp"]);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("backend arguments are required"));
    Ok(())
}

#[test]
fn dump_writes_nothing_when_backend_args_are_missing() -> TestResult {
    let temp_dir = tempfile::tempdir()?;
    let out_path = temp_dir.path().join("lsass.dmp");
    let mut cmd = Command::cargo_bin("dump_process_memory")?;
    cmd.arg("lsass.exe").arg(&out_path);
    cmd.assert().failure().code(1);
    assert!(!out_path.exists());
    Ok(())
}

#[test]
fn handles_without_positionals_exits_one() -> TestResult {
    let mut cmd = Command::cargo_bin("list_process_handles")?;
    cmd.assert().failure().code(1);
    Ok(())
}

#[test]
fn handles_without_backend_args_names_the_requirement() -> TestResult {
    let mut cmd = Command::cargo_bin("list_process_handles")?;
    cmd.arg("explorer.exe");
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("backend arguments are required"));
    Ok(())
}

#[test]
fn scan_without_positionals_exits_one() -> TestResult {
    let mut cmd = Command::cargo_bin("yara_scan_process")?;
    cmd.arg("lsass.exe");
    cmd.assert().failure().code(1);
    Ok(())
}

#[test]
fn scan_without_backend_args_names_the_requirement() -> TestResult {
    let mut cmd = Command::cargo_bin("yara_scan_process")?;
    cmd.args(["lsass.exe", "suspicious.yara"]);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("backend arguments are required"));
    Ok(())
}

#[test]
fn scan_reports_a_missing_rule_file_distinctly() -> TestResult {
    // The rule-file check runs before the engine is opened, so a nonexistent
    // path must produce the specific message and still exit 0.
    let temp_dir = tempfile::tempdir()?;
    let rule_path = temp_dir.path().join("no_such_rules.yara");
    let mut cmd = Command::cargo_bin("yara_scan_process")?;
    cmd.arg("lsass.exe")
        .arg(&rule_path)
        .args(["-device", "memory.dmp"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("YARA rule file not found"))
        .stderr(predicate::str::contains("ERROR").not());
    Ok(())
}

#[test]
fn classification_without_backend_args_names_the_requirement() -> TestResult {
    let mut cmd = Command::cargo_bin("system_classification")?;
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("backend arguments are required"));
    Ok(())
}

#[test]
fn classification_writes_no_report_when_validation_fails() -> TestResult {
    let temp_dir = tempfile::tempdir()?;
    let report_path = temp_dir.path().join("classification.json");
    let mut cmd = Command::cargo_bin("system_classification")?;
    cmd.arg("--output").arg(&report_path);
    cmd.assert().failure().code(1);
    assert!(!report_path.exists());
    Ok(())
}
