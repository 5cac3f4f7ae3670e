//! gentoo-bootstrap - run test commands on freshly launched EC2 instances

use std::process::ExitCode;

use bootstrap_cli::cli::Cli;
use bootstrap_cli::domain::ConfigError;
use bootstrap_cli::output::json::format_error;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let code = if e.downcast_ref::<ConfigError>().is_some() {
                "CONFIG_INVALID"
            } else {
                "ERROR"
            };
            match format_error(&format!("{e:#}"), code) {
                Ok(doc) if json => println!("{doc}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
