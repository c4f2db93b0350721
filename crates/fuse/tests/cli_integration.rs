//! CLI integration tests for the Fuse command-line interface.
//!
//! These tests do not need a tool server: they cover help output, config
//! management against a temporary directory, and local validation failures.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the fuse binary with an isolated config directory.
fn fuse(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fuse").unwrap();
    cmd.env("FUSE_CONFIG_DIR", config_dir.path()).env_remove("FUSE_SERVER_URL");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("ping"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fuse"));
}

#[test]
fn test_chat_help_shows_overrides() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--no-memory"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client.yaml"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}

#[test]
fn test_config_set_then_show() {
    let dir = TempDir::new().unwrap();

    fuse(&dir)
        .args(["config", "set", "server-url", "http://localhost:3000/mcp"])
        .assert()
        .success();
    fuse(&dir)
        .args(["config", "set", "provider", "anthropic"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("client.yaml")).unwrap();
    assert!(saved.contains("server-url: http://localhost:3000/mcp"));

    fuse(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3000/mcp"))
        .stdout(predicate::str::contains("anthropic"))
        .stdout(predicate::str::contains("claude-3-sonnet-20240229"));
}

#[test]
fn test_config_show_json() {
    let dir = TempDir::new().unwrap();
    let output = fuse(&dir)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["provider"], "openai");
    assert_eq!(value["model"], "gpt-3.5-turbo");
    assert_eq!(value["use_memory"], true);
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid keys"));
}

#[test]
fn test_config_set_rejects_bad_provider() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["config", "set", "provider", "mistral"])
        .assert()
        .failure();
    assert!(!dir.path().join("client.yaml").exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ask_without_server_fails() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["ask", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please configure your MCP Server URL first"));
}

#[test]
fn test_ping_without_server_fails() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .arg("ping")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a server URL first"));
}

#[test]
fn test_ask_rejects_unknown_provider() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["ask", "hello", "--provider", "mistral"])
        .assert()
        .failure();
}

#[test]
fn test_ask_unreachable_server_fails() {
    let dir = TempDir::new().unwrap();
    fuse(&dir)
        .args(["--server", "http://127.0.0.1:1/mcp", "ask", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Connection failed"));
}
