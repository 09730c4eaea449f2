//! Integration tests for command mode (-c/--command flag)

use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        // Tests must be deterministic and not depend on a user's ~/.config/websheet/config.toml.
        .arg("--no-config")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_leading_equals_is_optional() {
    let (stdout, _, code) = run_command(&["-c", "=10/4", "-c", "2/3"]);
    assert_eq!(stdout.trim(), "2.5\n0.67");
    assert_eq!(code, 0);
}

#[test]
fn test_division_by_zero_prints_error_marker() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert_eq!(stdout.trim(), "#ERROR");
    assert_eq!(code, 0);
}

#[test]
fn test_aggregate_over_set_cells() {
    let (stdout, _, code) = run_command(&[
        "--set", "A1=2", "--set", "B1=3", "-c", "SUM(A1:B1)", "-c", "AVERAGE(A1,B1,C1)",
    ]);
    assert_eq!(stdout.trim(), "5\n2.5");
    assert_eq!(code, 0);
}

#[test]
fn test_referencing_cell_stays_stale() {
    let (stdout, _, code) = run_command(&[
        "-s", "A1=1", "-s", "B1==A1+1", "-s", "A1=10", "-c", "B1", "-c", "A1+1",
    ]);
    assert_eq!(stdout.trim(), "2\n11");
    assert_eq!(code, 0);
}

#[test]
fn test_dependents_config_recomputes() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "recalc = \"dependents\"\n").unwrap();

    let (stdout, _, code) = run_command(&[
        "--config",
        config.to_str().unwrap(),
        "-s", "A1=1", "-s", "B1==A1+1", "-s", "A1=10", "-c", "B1",
    ]);
    assert_eq!(stdout.trim(), "11");
    assert_eq!(code, 0);
}

#[test]
fn test_export_and_reopen_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("sheet.wss");
    let snapshot_arg = snapshot.to_str().unwrap();

    let (_, _, code) = run_command(&["-s", "C3==7*6", "--json", snapshot_arg]);
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&snapshot).unwrap();
    assert!(content.contains("\"fileName\""));
    assert!(content.contains("\"timestamp\""));

    let (stdout, _, code) = run_command(&[snapshot_arg, "-c", "C3"]);
    assert_eq!(stdout.trim(), "42");
    assert_eq!(code, 0);
}

#[test]
fn test_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("out.csv");
    let config = dir.path().join("small.toml");
    std::fs::write(&config, "rows = 2\ncolumns = 2\n").unwrap();

    let (_, _, code) = run_command(&[
        "--config",
        config.to_str().unwrap(),
        "-s", "A1=x",
        "-s", "B2==2*2",
        "--csv",
        csv.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(
        std::fs::read_to_string(&csv).unwrap(),
        "\"x\",\"\"\n\"\",\"4\""
    );
}

#[test]
fn test_unknown_option_fails() {
    let (_, stderr, code) = run_command(&["--bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown option"));
}

#[test]
fn test_invalid_set_identifier_fails() {
    let (_, stderr, code) = run_command(&["--set", "1A=3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid cell identifier"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_invalid_user_config_warns_once_and_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("websheet");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "decimal_places = \"many\"\n").unwrap();

    let output = Command::new("cargo")
        .args(["run", "-q", "--", "-c", "2/3"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout.trim(), "0.67");
    assert_eq!(stderr.matches("Warning: ignoring").count(), 1);
}
