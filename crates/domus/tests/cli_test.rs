//! Integration tests for the `domus` CLI binary.
//!
//! These tests validate argument parsing, help output, and error
//! handling — all without requiring a live server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `domus` binary with env isolation.
///
/// Clears all `DOMUS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn domus_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("domus");
    cmd.env("HOME", "/tmp/domus-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/domus-cli-test-nonexistent")
        .env_remove("DOMUS_PROFILE")
        .env_remove("DOMUS_SERVER")
        .env_remove("DOMUS_USERNAME")
        .env_remove("DOMUS_PASSWORD")
        .env_remove("DOMUS_OUTPUT")
        .env_remove("DOMUS_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = domus_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    domus_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("home dashboard")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("events")),
    );
}

#[test]
fn test_version_flag() {
    domus_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("domus"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = domus_cmd().arg("frobnicate").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("frobnicate"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_status_without_config_fails_with_help() {
    let output = domus_cmd().arg("status").output().unwrap();
    assert!(!output.status.success(), "Expected failure without config");
    let text = combined_output(&output);
    assert!(
        text.contains("config") || text.contains("configuration"),
        "Expected config hint in output:\n{text}"
    );
}

#[test]
fn test_devices_toggle_requires_name() {
    domus_cmd()
        .args(["devices", "toggle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME").or(predicate::str::contains("name")));
}

#[test]
fn test_invalid_output_format_rejected() {
    domus_cmd()
        .args(["--output", "xml", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}

// ── Config commands (no server needed) ──────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    domus_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_file_shows_defaults() {
    domus_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_init_writes_profile() {
    let home = tempfile_dir();
    domus_cmd()
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", format!("{home}/.config"))
        .args([
            "config",
            "init",
            "--server",
            "http://hub:8080",
            "--username",
            "alice",
            "--name",
            "casa",
        ])
        .assert()
        .success();

    domus_cmd()
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", format!("{home}/.config"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("casa").and(predicate::str::contains("hub:8080")));
}

fn tempfile_dir() -> String {
    let dir = std::env::temp_dir().join(format!("domus-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.display().to_string()
}

// ── Round trips against a mock server ───────────────────────────────

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stand up a mock server that accepts the login and serves one state
/// snapshot with two devices.
async fn mock_dashboard() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "devices": {"luz_cocina": true, "ventilador": false},
            "sensors": {
                "temperatura": 21.5,
                "movimiento": false,
                "puerta_abierta": false,
                "humo": false
            },
            "events": [],
            "user": "admin",
            "role": "admin"
        })))
        .mount(&server)
        .await;

    server
}

/// Run the binary against the mock server, credentials via env.
async fn run_against(server_uri: String, args: &[&str]) -> std::process::Output {
    let args: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
    tokio::task::spawn_blocking(move || {
        domus_cmd()
            .env("DOMUS_SERVER", server_uri)
            .env("DOMUS_USERNAME", "admin")
            .env("DOMUS_PASSWORD", "admin123")
            .args(args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_round_trip() {
    let server = mock_dashboard().await;

    let output = run_against(server.uri(), &["status", "--output", "json"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("luz_cocina"), "stdout:\n{stdout}");
    assert!(stdout.contains("21.5"), "stdout:\n{stdout}");
    assert!(stdout.contains("admin"), "stdout:\n{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_toggle_round_trip() {
    let server = mock_dashboard().await;

    // luz_cocina is on, so a toggle must request `state: false`.
    Mock::given(method("POST"))
        .and(path("/api/toggle"))
        .and(body_json(serde_json::json!({
            "device": "luz_cocina",
            "state": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(server.uri(), &["devices", "toggle", "luz_cocina"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(
        combined_output(&output).contains("Apagado"),
        "{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_toggle_unknown_device_fails_locally() {
    let server = mock_dashboard().await;

    // No /api/toggle mock mounted: the command must fail before posting.
    let output = run_against(server.uri(), &["devices", "toggle", "fantasma"]).await;

    assert!(!output.status.success());
    assert!(
        combined_output(&output).contains("fantasma"),
        "{}",
        combined_output(&output)
    );
}
