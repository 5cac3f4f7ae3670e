//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    ConfigStore, Connection, ExecChannel, Pacer, Pause, SessionInfo, SessionProvider,
};
pub use services::batch::{BatchSummary, run_batch};
pub use services::remote_test::{ExecSinks, RemoteCommandRunner, RunnerConfig};
