#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the litellm-user binary.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use httpmock::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    run_with_env(args, &[])
}

fn run_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_litellm-user"))
        .args(args)
        .env_remove("LITELLM_API_BASE")
        .env_remove("LITELLM_API_KEY")
        .env_remove("RUST_LOG")
        .envs(env.iter().copied())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to execute litellm-user")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_config(dir: &TempDir, base_url: &str) -> String {
    let path = dir.path().join("litellm.yaml");
    let yaml = format!(
        "provider:\n  base_url: {base_url}\n  api_key: sk-smoke\n  allow_insecure_http: true\n  consistency:\n    mode: poll\n    interval: 20ms\n    timeout: 500ms\nstate_file: {}\n",
        dir.path().join("state.json").display()
    );
    std::fs::write(&path, yaml).unwrap();
    path.to_str().unwrap().to_owned()
}

fn write_attributes(dir: &TempDir, attrs: &Value) -> String {
    let path = dir.path().join("attrs.json");
    std::fs::write(&path, attrs.to_string()).unwrap();
    path.to_str().unwrap().to_owned()
}

fn read_state(dir: &TempDir) -> Value {
    let raw = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_cli_help_command() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Usage:"));
    for command in ["create", "read", "update", "delete", "import", "show", "check"] {
        assert!(out.contains(command), "help should list {command}");
    }
    assert!(out.contains("--config"));
    assert!(out.contains("--state"));
}

#[test]
fn test_cli_version_command() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("litellm-user"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run(&["frobnicate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error"));
}

#[test]
fn test_cli_missing_config_file() {
    let output = run(&["--config", "/nonexistent/litellm.yaml", "check"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_cli_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "provider: [unclosed").unwrap();

    let output = run(&["--config", path.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid configuration"));
}

#[test]
fn test_cli_check_without_base_url_fails() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    let output = run(&["--state", state.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("base_url"));
}

#[test]
fn test_cli_check_valid_config_redacts_key() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "http://127.0.0.1:4000");

    let output = run(&["--config", &config, "check"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Configuration is valid"));
    assert!(out.contains("127.0.0.1:4000"));
    assert!(!out.contains("sk-smoke"));
}

#[test]
fn test_cli_show_empty_state() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    let output = run(&["--state", state.to_str().unwrap(), "show"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let shown: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown, json!({"version": 1, "resources": {}}));
}

#[test]
fn test_cli_show_with_only_api_key_in_env() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    let output = run_with_env(
        &["--state", state.to_str().unwrap(), "show"],
        &[("LITELLM_API_KEY", "sk-env-only")],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_with_env(
        &["--state", state.to_str().unwrap(), "check"],
        &[("LITELLM_API_KEY", "sk-env-only")],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("base_url"));
}

#[test]
fn test_cli_create_read_delete_lifecycle() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/user/new")
            .header("authorization", "Bearer sk-smoke")
            .body_includes(r#""user_role":"internal_user""#)
            .body_includes(r#""max_budget":100.0"#);
        then.status(200).json_body(json!({}));
    });
    let info = server.mock(|when, then| {
        when.method(GET).path("/user/info");
        then.status(200).json_body(json!({
            "user_info": {
                "user_role": "internal_user",
                "max_budget": 100.0,
                "models": ["gpt-4"]
            }
        }));
    });
    let delete = server.mock(|when, then| {
        when.method(POST).path("/user/delete");
        then.status(200).json_body(json!({}));
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.base_url());
    let attrs = write_attributes(
        &dir,
        &json!({"user_role": "internal_user", "max_budget": 100.0, "models": ["gpt-4"]}),
    );

    let output = run(&["--config", &config, "create", "--name", "alice", "--attributes", &attrs]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    create.assert();

    let state = read_state(&dir);
    let id = state["resources"]["alice"]["id"].as_str().unwrap().to_owned();
    assert!(!id.is_empty());
    assert_eq!(state["resources"]["alice"]["attributes"]["models"], json!(["gpt-4"]));

    let output = run(&["--config", &config, "read", "--name", "alice"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(info.calls() >= 2);

    let output = run(&["--config", &config, "delete", "--name", "alice"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    delete.assert();
    assert_eq!(read_state(&dir)["resources"], json!({}));
}

#[test]
fn test_cli_read_drops_vanished_user() {
    let server = MockServer::start();
    let _info = server.mock(|when, then| {
        when.method(GET).path("/user/info");
        then.status(404).body("not found");
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.base_url());
    seed_state(dir.path(), "bob", "u-bob");

    let output = run(&["--config", &config, "read", "--name", "bob"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("removed from state"));
    assert_eq!(read_state(&dir)["resources"], json!({}));
}

#[test]
fn test_cli_delete_treats_not_found_as_done() {
    let server = MockServer::start();
    let _delete = server.mock(|when, then| {
        when.method(POST).path("/user/delete");
        then.status(404).body("user not found");
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.base_url());
    seed_state(dir.path(), "bob", "u-bob");

    let output = run(&["--config", &config, "delete", "--name", "bob"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read_state(&dir)["resources"], json!({}));
}

#[test]
fn test_cli_delete_failure_keeps_state() {
    let server = MockServer::start();
    let _delete = server.mock(|when, then| {
        when.method(POST).path("/user/delete");
        then.status(500).body("boom");
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.base_url());
    seed_state(dir.path(), "bob", "u-bob");

    let output = run(&["--config", &config, "delete", "--name", "bob"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("HTTP 500"));
    assert_eq!(read_state(&dir)["resources"]["bob"]["id"], json!("u-bob"));
}

#[test]
fn test_cli_import_existing_user() {
    let server = MockServer::start();
    let _info = server.mock(|when, then| {
        when.method(GET)
            .path("/user/info")
            .query_param("user_id", "legacy-1");
        then.status(200).json_body(json!({
            "user_info": {"user_role": "proxy_admin", "user_alias": "root"}
        }));
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.base_url());

    let output = run(&["--config", &config, "import", "--name", "admin", "--id", "legacy-1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let state = read_state(&dir);
    assert_eq!(state["resources"]["admin"]["id"], json!("legacy-1"));
    assert_eq!(
        state["resources"]["admin"]["attributes"]["user_role"],
        json!("proxy_admin")
    );
}

#[test]
fn test_cli_rejects_unknown_role() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "http://127.0.0.1:1");
    let attrs = write_attributes(&dir, &json!({"user_role": "superuser"}));

    let output = run(&["--config", &config, "create", "--name", "x", "--attributes", &attrs]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid attributes"));
}

fn seed_state(dir: &Path, name: &str, id: &str) {
    let state = json!({
        "version": 1,
        "resources": {
            name: {"id": id, "attributes": {"user_role": "team"}}
        }
    });
    std::fs::write(dir.join("state.json"), state.to_string()).unwrap();
}
