//! CLI integration tests

use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "exporter-gen", "--"])
        .args(args)
        .env_remove("EXPORTER_GEN_CONFIG")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("generate"), "Should show generate command");
    assert!(stdout.contains("verify"), "Should show verify command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("exporter-gen"), "Should show binary name");
}

/// Dry run prints both artifacts without writing them
#[test]
fn test_generate_dry_run() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().to_str().unwrap();

    let output = run(&[
        "--output-dir",
        output_dir,
        "generate",
        "--hostname",
        "web-01",
        "--port",
        "9100",
        "--dry-run",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Dry run should succeed");
    assert!(stdout.contains("Name='web-01'"));
    assert!(stdout.contains("9100:9100"));
    assert!(stdout.contains("--web.listen-address=:9100"));
    assert!(!dir.path().join("windows_config.yml").exists());
}

/// Generate writes both artifacts, verify reads them back
#[test]
fn test_generate_then_verify() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().to_str().unwrap();

    let output = run(&[
        "--output-dir",
        output_dir,
        "generate",
        "--hostname",
        "web-01",
        "--port",
        "9100",
        "--port",
        "9100",
        "--port",
        "9200",
        "--verify",
    ]);
    assert!(output.status.success(), "Generate should succeed");
    assert!(dir.path().join("windows_config.yml").exists());
    assert!(dir.path().join("docker-compose.yml").exists());

    let output = run(&["--output-dir", output_dir, "verify"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Verify should succeed");
    assert!(stdout.contains("telemetry.addr: :9200"));
    assert!(stdout.contains("ports: 9100:9100, 9200:9200"));
    assert!(stdout.contains("hostname: web-01"));
}

/// Verify without prior artifacts fails
#[test]
fn test_verify_without_artifacts_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["--output-dir", dir.path().to_str().unwrap(), "verify"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Verify should fail");
    assert!(stderr.contains("artifact not found"));
}

/// Ports that are not valid network ports are refused
#[test]
fn test_generate_rejects_invalid_port() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().to_str().unwrap();

    for port in ["abc", "70000"] {
        let output = run(&[
            "--output-dir",
            output_dir,
            "generate",
            "--hostname",
            "web-01",
            "--port",
            port,
        ]);
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert!(!output.status.success(), "Port {} should be rejected", port);
        assert!(stderr.contains("invalid port"), "Unexpected error: {}", stderr);
    }
    assert!(!dir.path().join("windows_config.yml").exists());
}
