//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `bootstrap_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use bootstrap_common::InstanceInfo;

use crate::domain::{BootstrapConfig, Target, TransportError};

// ── Remote session ports ──────────────────────────────────────────────────────

/// A single command-execution stream multiplexed over a session.
///
/// Setters only record state; nothing is sent to the remote side until
/// [`ExecChannel::connect`].
pub trait ExecChannel {
    /// Bind the command text to run.
    fn set_command(&mut self, command: &str);
    /// Request a pseudo-terminal for the command.
    fn set_pty(&mut self, enabled: bool);
    /// Send remote stderr straight to `sink`.
    fn set_err_stream(&mut self, sink: Box<dyn Write + Send>);
    /// Start the command on the remote side.
    fn connect(&mut self) -> Result<(), TransportError>;
    /// Bytes of stdout that can be read right now without blocking.
    fn available(&mut self) -> Result<usize, TransportError>;
    /// Read up to `buf.len()` bytes of stdout. Only blocks if called when
    /// [`ExecChannel::available`] reported zero.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
    /// Whether the remote side has closed the channel.
    fn is_closed(&mut self) -> bool;
    /// Exit code of the remote command. Only meaningful once closed.
    fn exit_status(&mut self) -> Result<i32, TransportError>;
    fn disconnect(&mut self) -> Result<(), TransportError>;
}

/// An established SSH connection to one instance.
#[cfg_attr(test, mockall::automock)]
pub trait Connection {
    fn open_exec_channel(&mut self) -> Result<Box<dyn ExecChannel + Send>, TransportError>;
    fn disconnect(&mut self) -> Result<(), TransportError>;
}

/// An instance paired with a live connection, or with none when
/// provisioning or connection setup failed upstream.
pub struct SessionInfo {
    instance: InstanceInfo,
    connection: Option<Box<dyn Connection + Send>>,
}

impl SessionInfo {
    #[must_use]
    pub fn connected(instance: InstanceInfo, connection: Box<dyn Connection + Send>) -> Self {
        Self {
            instance,
            connection: Some(connection),
        }
    }

    #[must_use]
    pub fn absent(instance: InstanceInfo) -> Self {
        Self {
            instance,
            connection: None,
        }
    }

    #[must_use]
    pub fn instance(&self) -> &InstanceInfo {
        &self.instance
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.connection.is_some()
    }

    #[must_use]
    pub fn into_parts(self) -> (InstanceInfo, Option<Box<dyn Connection + Send>>) {
        (self.instance, self.connection)
    }
}

impl fmt::Debug for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInfo")
            .field("instance", &self.instance)
            .field("present", &self.is_present())
            .finish()
    }
}

/// Opens sessions to targets. Never fails: a target that cannot be reached
/// yields a [`SessionInfo`] without a connection.
pub trait SessionProvider {
    fn open(&self, target: &Target) -> SessionInfo;
}

// ── Pacing port ───────────────────────────────────────────────────────────────

/// How a [`Pacer::pause`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full interval passed.
    Elapsed,
    /// A cancellation request cut the pause short.
    Cancelled,
}

/// Timed wait between output polls.
#[cfg_attr(test, mockall::automock)]
pub trait Pacer {
    fn pause(&self, interval: Duration) -> Pause;
    /// Whether cancellation has already been requested.
    fn is_cancelled(&self) -> bool;
}

// ── Config port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence (load/save).
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<BootstrapConfig>;
    /// Persist configuration.
    fn save(&self, config: &BootstrapConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
