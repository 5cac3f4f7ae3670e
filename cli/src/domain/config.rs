//! Domain types and validators for gentoo-bootstrap configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use bootstrap_common::BundleCredentials;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Command run on each instance when none is configured.
pub const DEFAULT_TEST_COMMAND: &str = "uname -a";

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "test.command",
    "test.user",
    "test.identity_file",
    "test.port",
    "test.connect_timeout_secs",
    "test.poll_interval_ms",
    "test.pty",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.gentoo-bootstrap/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Credentials used when bundling images. Optional: `test` never needs them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleCredentials>,
    /// Remote test settings.
    pub test: TestConfig,
}

/// Settings for the remote test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Shell command executed on every instance.
    pub command: String,
    /// Login user on the instance.
    pub user: String,
    /// SSH private key; the SSH agent is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<PathBuf>,
    pub port: u16,
    pub connect_timeout_secs: u64,
    /// Pause between output polls while the command produces nothing.
    pub poll_interval_ms: u64,
    /// Request a pseudo-terminal for the command.
    pub pty: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_TEST_COMMAND.to_string(),
            user: "ec2-user".to_string(),
            identity_file: None,
            port: 22,
            connect_timeout_secs: 30,
            poll_interval_ms: 1000,
            pty: true,
        }
    }
}

impl TestConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

fn invalid(key: &str, value: &str, expected: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into()
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "test.command" | "test.user" if value.trim().is_empty() => {
            Err(invalid(key, value, "a non-empty string"))
        }
        "test.port" => match value.parse::<u16>() {
            Ok(p) if p > 0 => Ok(()),
            _ => Err(invalid(key, value, "a port number between 1 and 65535")),
        },
        "test.connect_timeout_secs" | "test.poll_interval_ms" => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(invalid(key, value, "a positive integer")),
        },
        "test.pty" => match value {
            "true" | "false" => Ok(()),
            _ => Err(invalid(key, value, "true or false")),
        },
        _ => Ok(()),
    }
}

/// Validates `key`/`value` and writes the value into `config`.
///
/// An empty `test.identity_file` unsets the key file so the SSH agent is
/// used again.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value is invalid for it.
pub fn apply_config_value(config: &mut BootstrapConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let test = &mut config.test;
    match key {
        "test.command" => test.command = value.to_string(),
        "test.user" => test.user = value.to_string(),
        "test.identity_file" => {
            test.identity_file = (!value.trim().is_empty()).then(|| PathBuf::from(value));
        }
        "test.port" => test.port = value.parse()?,
        "test.connect_timeout_secs" => test.connect_timeout_secs = value.parse()?,
        "test.poll_interval_ms" => test.poll_interval_ms = value.parse()?,
        "test.pty" => test.pty = value == "true",
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
