//! Integration tests for the `bopi` CLI binary.
//!
//! Argument parsing, error handling and exit codes run without a device;
//! fetch-based commands run against a wiremock controller.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `bopi` binary with env isolation.
///
/// Clears all `BOPI_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn bopi_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bopi");
    cmd.env("HOME", "/tmp/bopi-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bopi-cli-test-nonexistent")
        .env_remove("BOPI_PROFILE")
        .env_remove("BOPI_CONFIG")
        .env_remove("BOPI_HOST")
        .env_remove("BOPI_PORT")
        .env_remove("BOPI_TIMEOUT")
        .env_remove("BOPI_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `bopi` pointed at a mock controller.
fn bopi_at(server: &MockServer) -> assert_cmd::Command {
    let addr = server.address();
    let mut cmd = bopi_cmd();
    cmd.args([
        "--host",
        &addr.ip().to_string(),
        "--port",
        &addr.port().to_string(),
    ]);
    cmd
}

async fn mock_controller(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn sample_state() -> Value {
    json!({
        "temp1": 24.5,
        "phvalue": 7.2,
        "uptime": 86400,
        "pool_pump": { "status": true },
        "relay1": { "status": false }
    })
}

fn config_arg(path: &Path) -> [String; 2] {
    ["--config".into(), path.display().to_string()]
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = bopi_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in output:\n{stderr}");
}

#[test]
fn test_help_flag() {
    bopi_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("state")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("validate")),
    );
}

#[test]
fn test_version_flag() {
    bopi_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bopi"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_state_without_controller() {
    bopi_cmd()
        .arg("state")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No controller configured"));
}

#[test]
fn test_invalid_host_is_usage_error() {
    bopi_cmd()
        .args(["--host", "http://10.0.0.1", "state"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid value for host"));
}

#[test]
fn test_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    bopi_cmd()
        .args(config_arg(&dir.path().join("config.toml")))
        .args(["--profile", "garden", "state"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile 'garden' not found"));
}

#[test]
fn test_switch_control_is_unsupported() {
    bopi_cmd()
        .args(["--host", "10.0.0.1", "switch", "on", "pool_pump"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn test_switch_unknown_key() {
    bopi_cmd()
        .args(["--host", "10.0.0.1", "switch", "off", "relay9"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("relay9"));
}

#[test]
fn test_get_rejects_malformed_path() {
    bopi_cmd()
        .args(["--host", "10.0.0.1", "get", "relay1..status"])
        .assert()
        .code(2);
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_state_json_lists_entities() {
    let server = mock_controller(sample_state()).await;

    let output = bopi_at(&server)
        .args(["state", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let entities: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entities.len(), 13);

    let temp1 = entities.iter().find(|e| e["key"] == "temp1").unwrap();
    assert_eq!(temp1["value"], json!(24.5));
    assert_eq!(temp1["availability"], "fresh");

    let pump = entities.iter().find(|e| e["key"] == "pool_pump").unwrap();
    assert_eq!(pump["value"], json!(true));

    let relay3 = entities.iter().find(|e| e["key"] == "relay3").unwrap();
    assert_eq!(relay3["value"], json!(false));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_state_plain_applies_precision() {
    let server = mock_controller(sample_state()).await;

    bopi_at(&server)
        .args(["state", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("phvalue=7.20")
                .and(predicate::str::contains("uptime=86400 s"))
                .and(predicate::str::contains("temp2=-")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_reads_nested_value() {
    let server = mock_controller(sample_state()).await;

    bopi_at(&server)
        .args(["get", "pool_pump.status"])
        .assert()
        .success()
        .stdout("true\n");

    bopi_at(&server)
        .args(["get", "relay4.status"])
        .assert()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_controller_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    bopi_at(&server)
        .arg("state")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Error connecting to API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_validate_reports_title() {
    let server = mock_controller(sample_state()).await;

    bopi_at(&server)
        .args(["validate", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BoPi (127.0.0.1) is reachable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_stops_after_count() {
    let server = mock_controller(sample_state()).await;

    let output = bopi_at(&server)
        .args(["watch", "--count", "1", "-o", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);

    let update: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(update["availability"], "fresh");
    assert_eq!(update["entities"].as_array().unwrap().len(), 13);
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_init_then_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    bopi_cmd()
        .args(config_arg(&path))
        .args([
            "config",
            "init",
            "--name",
            "pool",
            "--controller",
            "10.10.10.1",
            "--scan-interval",
            "60",
            "--no-validate",
        ])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("default_profile = \"pool\""), "{saved}");
    assert!(saved.contains("host = \"10.10.10.1\""), "{saved}");

    bopi_cmd()
        .args(config_arg(&path))
        .args(["config", "profiles", "-o", "plain"])
        .assert()
        .success()
        .stdout("pool\n");
}

#[test]
fn test_config_rejects_short_interval() {
    let dir = tempfile::tempdir().unwrap();
    bopi_cmd()
        .args(config_arg(&dir.path().join("config.toml")))
        .args([
            "config",
            "init",
            "--controller",
            "10.10.10.1",
            "--scan-interval",
            "5",
            "--no-validate",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scan_interval"));
}

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");

    bopi_cmd()
        .args(config_arg(&path))
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
