//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed JSON document
//! on stdout. Failures use the error object from [`format_error`].

use anyhow::{Context, Result};
use bootstrap_common::ExecutionResult;

use crate::application::BatchSummary;
use crate::domain::BootstrapConfig;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders domain types as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        let obj = serde_json::json!({ "version": version });
        println!("{}", serde_json::to_string_pretty(&obj).context("JSON serialization failed")?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_results(results: &[ExecutionResult]) -> Result<()> {
        println!("{}", format_results(results)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(config: &BootstrapConfig, path: &std::path::Path) -> Result<()> {
        let mut shown = config.clone();
        shown.bundle = shown.bundle.map(|b| b.redacted());
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "config": shown,
        });
        println!("{}", serde_json::to_string_pretty(&obj).context("JSON serialization failed")?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_set(key: &str, value: &str) -> Result<()> {
        let obj = serde_json::json!({ "key": key, "value": value });
        println!("{}", serde_json::to_string_pretty(&obj).context("JSON serialization failed")?);
        Ok(())
    }
}

/// Results document: `{"results": [...], "summary": {...}}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_results(results: &[ExecutionResult]) -> Result<String> {
    let obj = serde_json::json!({
        "results": results,
        "summary": BatchSummary::from_results(results),
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
