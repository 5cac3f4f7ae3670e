//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod target;

pub use config::{
    BootstrapConfig, DEFAULT_TEST_COMMAND, TestConfig, apply_config_value, validate_config_key,
    validate_config_value,
};
pub use error::{ConfigError, TargetError, TransportError};
pub use target::Target;
