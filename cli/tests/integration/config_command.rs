//! Integration tests for `gentoo-bootstrap config`.
//!
//! All filesystem-touching tests set `BOOTSTRAP_CONFIG` to a temp path so
//! they never read or write `~/.gentoo-bootstrap/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bootstrap(config_path: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gentoo-bootstrap"));
    cmd.env("NO_COLOR", "1").env("BOOTSTRAP_CONFIG", config_path);
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("BOOTSTRAP_BUNDLE_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

fn with_bundle_env(cmd: &mut Command) -> &mut Command {
    cmd.env("BOOTSTRAP_BUNDLE_ACCOUNT_NUMBER", "123456789012")
        .env("BOOTSTRAP_BUNDLE_REMOTE_EC2_PRIVATE_KEY", "/tmp/pk.pem")
        .env("BOOTSTRAP_BUNDLE_LOCAL_EC2_PRIVATE_KEY", "/keys/pk.pem")
        .env("BOOTSTRAP_BUNDLE_REMOTE_EC2_CERT", "/tmp/cert.pem")
        .env("BOOTSTRAP_BUNDLE_LOCAL_EC2_CERT", "/keys/cert.pem")
        .env("BOOTSTRAP_BUNDLE_ACCESS_KEY_ID", "AKIAEXAMPLE")
        .env("BOOTSTRAP_BUNDLE_SECRET_ACCESS_KEY", "topsecretvalue")
        .env("BOOTSTRAP_BUNDLE_BUCKET", "images")
}

// ---------------------------------------------------------------------------
// Subcommand registration
// ---------------------------------------------------------------------------

#[test]
fn test_config_help_shows_subcommands() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

// ---------------------------------------------------------------------------
// `config path` / `config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_path_honours_env_override() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uname -a"))
        .stdout(predicate::str::contains("ec2-user"))
        .stdout(predicate::str::contains("(not configured)"));
}

#[test]
fn test_config_show_json_is_valid() {
    let (_dir, path) = temp_config_path();
    let output = bootstrap(&path)
        .args(["config", "show", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["config"]["test"]["command"], "uname -a");
    assert_eq!(v["config"]["test"]["port"], 22);
    assert_eq!(v["path"], path.as_str());
}

#[test]
fn test_config_show_redacts_bundle_secret_from_env() {
    let (_dir, path) = temp_config_path();
    let mut cmd = bootstrap(&path);
    with_bundle_env(&mut cmd)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AKIAEXAMPLE"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("topsecretvalue").not());
}

#[test]
fn test_config_show_rejects_incomplete_bundle_env() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .env("BOOTSTRAP_BUNDLE_BUCKET", "images")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete bundle credentials"));
}

#[cfg(unix)]
#[test]
fn test_config_show_tolerates_non_utf8_environment() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .env("LEGACY_BYTES", OsStr::from_bytes(b"f\xffo"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uname -a"));
}

// ---------------------------------------------------------------------------
// `config set`
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "set", "test.command", "emerge --info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set test.command = emerge --info"));

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("emerge --info"), "got: {content}");

    bootstrap(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emerge --info"));
}

#[test]
fn test_config_set_does_not_persist_env_bundle() {
    let (_dir, path) = temp_config_path();
    let mut cmd = bootstrap(&path);
    with_bundle_env(&mut cmd)
        .args(["config", "set", "test.port", "2222"])
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(!content.contains("topsecretvalue"), "got: {content}");
    assert!(!content.contains("bundle"), "got: {content}");
}

#[test]
fn test_config_set_empty_identity_file_clears_it() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "set", "test.identity_file", "/keys/id_ed25519"])
        .assert()
        .success();
    assert!(std::fs::read_to_string(&path).unwrap().contains("id_ed25519"));

    bootstrap(&path)
        .args(["config", "set", "test.identity_file", ""])
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(!content.contains("identity_file"), "got: {content}");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "set", "test.colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: test.colour"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_value_fails() {
    let (_dir, path) = temp_config_path();
    bootstrap(&path)
        .args(["config", "set", "test.port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for test.port"));
}

#[test]
fn test_config_set_invalid_value_json_error_object() {
    let (_dir, path) = temp_config_path();
    let output = bootstrap(&path)
        .args(["config", "set", "test.pty", "maybe", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "CONFIG_INVALID");
}
