use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a provisioned instance under test.
///
/// The runner treats this as a pass-through identifier: it is copied into
/// every result unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// EC2 instance id (e.g. `i-0abc1234def567890`) or a free-form label.
    pub id: String,
    /// Host name or IP address used to reach the instance.
    pub address: String,
}

impl InstanceInfo {
    #[must_use]
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for InstanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id == self.address {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.id, self.address)
        }
    }
}

/// How a remote test run ended.
///
/// Only [`ExitOutcome::Exited`] carries an exit code. The other variants keep
/// apart the reasons the code is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExitOutcome {
    /// The remote command ran to completion with this exit code.
    Exited { code: i32 },
    /// No live session was available; nothing was attempted.
    NoSession,
    /// The session or channel failed before an exit code was read.
    TransportFailed,
    /// The run was stopped by an operator before the command finished.
    Cancelled,
}

impl ExitOutcome {
    #[must_use]
    pub fn exited(code: i32) -> Self {
        Self::Exited { code }
    }

    /// Remote exit code, if the command ran to completion.
    #[must_use]
    pub fn code(self) -> Option<i32> {
        match self {
            Self::Exited { code } => Some(code),
            _ => None,
        }
    }

    /// `true` only for a completed command that exited with 0.
    #[must_use]
    pub fn is_success(self) -> bool {
        self.code() == Some(0)
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited { code } => write!(f, "exit status {code}"),
            Self::NoSession => f.write_str("no session"),
            Self::TransportFailed => f.write_str("transport failure"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of one remote test run against one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub instance: InstanceInfo,
    pub outcome: ExitOutcome,
}

impl ExecutionResult {
    #[must_use]
    pub fn new(instance: InstanceInfo, outcome: ExitOutcome) -> Self {
        Self { instance, outcome }
    }

    /// Remote exit code, if there is one.
    #[must_use]
    pub fn exit_status(&self) -> Option<i32> {
        self.outcome.code()
    }
}

/// Validate that an id that claims to be an EC2 instance id is well formed:
/// `i-` followed by 8 to 17 lowercase hex digits.
///
/// Ids without the `i-` prefix are free-form labels and always pass.
pub fn validate_instance_id(id: &str) -> Result<(), &'static str> {
    if id.is_empty() {
        return Err("instance id must not be empty");
    }
    let Some(suffix) = id.strip_prefix("i-") else {
        return Ok(());
    };
    if !(8..=17).contains(&suffix.len()) {
        return Err("instance id must have 8 to 17 hex digits after 'i-'");
    }
    if !suffix
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    {
        return Err("instance id suffix must be lowercase hex [a-f0-9]");
    }
    Ok(())
}
