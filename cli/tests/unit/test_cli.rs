//! End-to-end tests of the coolifyme binary

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;

const ENV_VARS: &[&str] = &[
    "COOLIFYME_API_TOKEN",
    "COOLIFY_API_TOKEN",
    "COOLIFYME_BASE_URL",
    "COOLIFY_BASE_URL",
    "COOLIFY_URL",
    "COOLIFYME_PROFILE",
    "COOLIFY_PROFILE",
    "COOLIFYME_LOG_LEVEL",
    "COOLIFY_LOG_LEVEL",
    "COOLIFYME_LOG_FORMAT",
    "COOLIFYME_CONFIG",
    "RUST_LOG",
];

/// Binary with a private config file and a clean environment
fn coolifyme(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("coolifyme").unwrap();
    for name in ENV_VARS {
        cmd.env_remove(name);
    }
    cmd.arg("--config").arg(config).arg("--no-color");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    coolifyme(&dir.path().join("config.yaml"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("env"))
        .stdout(predicate::str::contains("bulk"));
}

#[test]
fn test_version_command() {
    let dir = tempfile::tempdir().unwrap();
    coolifyme(&dir.path().join("config.yaml"))
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_profile_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");

    coolifyme(&config)
        .args(["--token", "tok-abcdef123", "profile", "create", "prod"])
        .assert()
        .success();
    assert!(config.exists());

    coolifyme(&config)
        .args(["--json", "profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"prod\""))
        .stdout(predicate::str::contains("*********f123"))
        .stdout(predicate::str::contains("tok-abcdef123").not());

    coolifyme(&config)
        .args(["--token", "other", "profile", "create", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    coolifyme(&config)
        .args(["profile", "use", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_api_commands_require_a_token() {
    let dir = tempfile::tempdir().unwrap();
    coolifyme(&dir.path().join("config.yaml"))
        .args(["apps", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token"));
}

#[test]
fn test_branch_and_pr_conflict_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    coolifyme(&dir.path().join("config.yaml"))
        .args([
            "--token",
            "t",
            "--base-url",
            "http://127.0.0.1:9/api/v1",
            "deploy",
            "app",
            "a1",
            "--branch",
            "main",
            "--pr",
            "4",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn test_json_log_format_traces_requests() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/version");
        then.status(200).body("4.0.0");
    });

    let dir = tempfile::tempdir().unwrap();
    coolifyme(&dir.path().join("config.yaml"))
        .env("COOLIFY_API_TOKEN", "env-token")
        .env("COOLIFY_BASE_URL", server.url("/api/v1"))
        .args(["--log-format", "json", "--log-level", "debug", "system", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4.0.0"))
        .stderr(predicate::str::contains(r#""message":"request""#))
        .stderr(predicate::str::contains(r#""message":"response""#))
        .stderr(predicate::str::contains("[REDACTED]"))
        .stderr(predicate::str::contains("env-token").not());
}

#[test]
fn test_apps_list_against_mock() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/applications")
            .header("Authorization", "Bearer env-token");
        then.status(200)
            .json_body(json!([{"uuid": "a1", "name": "web", "status": "running"}]));
    });

    let dir = tempfile::tempdir().unwrap();
    coolifyme(&dir.path().join("config.yaml"))
        .env("COOLIFY_API_TOKEN", "env-token")
        .env("COOLIFY_BASE_URL", server.url("/api/v1"))
        .args(["--json", "apps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a1\""));
    list.assert();
}

#[test]
fn test_env_export_dry_run_leaves_no_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/applications/a1/envs");
        then.status(200)
            .json_body(json!([{"uuid": "e1", "key": "K1", "value": "v1"}]));
    });

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.env");
    coolifyme(&dir.path().join("config.yaml"))
        .env("COOLIFY_API_TOKEN", "env-token")
        .env("COOLIFY_BASE_URL", server.url("/api/v1"))
        .args(["env", "export", "a1", "--dry-run", "-f"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would export 1 variable(s)"));
    assert!(!target.exists());
}
