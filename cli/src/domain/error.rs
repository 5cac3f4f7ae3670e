//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator at the command boundary.

use thiserror::Error;

// ── Transport errors ──────────────────────────────────────────────────────────

/// Failures talking to a remote instance over an SSH session or channel.
///
/// The runner never lets these escape; they become
/// `ExitOutcome::TransportFailed` in the result.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSH protocol error: {0}")]
    Protocol(String),

    #[error("authentication failed for {user}@{host}")]
    Auth { user: String, host: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

// ── Target errors ─────────────────────────────────────────────────────────────

/// Errors parsing a `<instance-id>=<host>[:<port>]` target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,

    #[error("target '{0}' has no host")]
    MissingHost(String),

    #[error("invalid port in target '{target}': {port}")]
    InvalidPort { target: String, port: String },

    #[error("invalid instance id '{id}': {reason}")]
    InvalidInstanceId { id: String, reason: &'static str },
}
