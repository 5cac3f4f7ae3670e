//! Human-readable terminal renderer.

use std::path::Path;

use bootstrap_common::{ExecutionResult, ExitOutcome};
use owo_colors::OwoColorize as _;
use owo_colors::Style;

use crate::application::BatchSummary;
use crate::domain::BootstrapConfig;
use crate::infra::config::CONFIG_ENV;
use crate::output::{OutputContext, Styles};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("gentoo-bootstrap {version}");
    }

    /// Render one line per instance followed by the batch summary.
    pub fn render_results(&self, results: &[ExecutionResult]) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Results:");
        for result in results {
            let style = outcome_style(&self.ctx.styles, result.outcome);
            println!(
                "  {} {:<40} {}",
                outcome_symbol(result.outcome).style(style),
                result.instance.to_string(),
                result.outcome
            );
        }
        println!();
        let summary = BatchSummary::from_results(results);
        let style = if summary.all_passed() {
            self.ctx.styles.success
        } else {
            self.ctx.styles.error
        };
        println!("  {}", format_summary(&summary).style(style));
    }

    /// Render the effective configuration. The bundle secret is never shown.
    pub fn render_config(&self, config: &BootstrapConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let test = &config.test;
        println!("  {:<28} {}", "test.command:", test.command);
        println!("  {:<28} {}", "test.user:", test.user);
        println!(
            "  {:<28} {}",
            "test.identity_file:",
            test.identity_file
                .as_ref()
                .map_or_else(|| "(ssh agent)".to_string(), |p| p.display().to_string())
        );
        println!("  {:<28} {}", "test.port:", test.port);
        println!("  {:<28} {}", "test.connect_timeout_secs:", test.connect_timeout_secs);
        println!("  {:<28} {}", "test.poll_interval_ms:", test.poll_interval_ms);
        println!("  {:<28} {}", "test.pty:", test.pty);
        println!();
        println!("  {}", "Bundle:".style(self.ctx.styles.bold));
        match &config.bundle {
            None => println!("    {}", "(not configured)".style(self.ctx.styles.dim)),
            Some(bundle) => {
                let b = bundle.redacted();
                println!("    {:<26} {}", "account_number:", b.account_number());
                println!("    {:<26} {}", "access_key_id:", b.access_key_id());
                println!("    {:<26} {}", "secret_access_key:", b.secret_access_key());
                println!("    {:<26} {}", "bucket:", b.bucket());
                println!("    {:<26} {}", "local_ec2_private_key:", b.local_ec2_private_key());
                println!("    {:<26} {}", "local_ec2_cert:", b.local_ec2_cert());
                println!("    {:<26} {}", "remote_ec2_private_key:", b.remote_ec2_private_key());
                println!("    {:<26} {}", "remote_ec2_cert:", b.remote_ec2_cert());
            }
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in [CONFIG_ENV, "RUST_LOG", "NO_COLOR"] {
            println!(
                "    {:<26} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Confirm a persisted setting.
    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }
}

fn outcome_style(styles: &Styles, outcome: ExitOutcome) -> Style {
    match outcome {
        ExitOutcome::Exited { code: 0 } => styles.success,
        ExitOutcome::Exited { .. } => styles.error,
        _ => styles.warning,
    }
}

/// Status glyph for an outcome.
#[must_use]
pub fn outcome_symbol(outcome: ExitOutcome) -> &'static str {
    match outcome {
        ExitOutcome::Exited { code: 0 } => "✓",
        ExitOutcome::Exited { .. } => "✗",
        _ => "⚠",
    }
}

/// One-line batch summary, e.g. `2 passed, 1 failed, 0 incomplete`.
#[must_use]
pub fn format_summary(summary: &BatchSummary) -> String {
    format!(
        "{} passed, {} failed, {} incomplete",
        summary.passed, summary.failed, summary.incomplete
    )
}
