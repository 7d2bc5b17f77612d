//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pricer-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Laptop Price Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("train"), "Should show train command");
    assert!(stdout.contains("evaluate"), "Should show evaluate command");
    assert!(stdout.contains("predict"), "Should show predict command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pricer-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("pricer"), "Should show binary name");
}

/// Test train subcommand help
#[test]
fn test_train_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pricer-cli", "--", "train", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Train help should succeed");
    assert!(stdout.contains("--train-csv"), "Should show train-csv flag");
    assert!(stdout.contains("--no-push"), "Should show no-push flag");
}
