//! manifest-lint CLI binary

use anyhow::Result;
use std::process::ExitCode;

use manifest_lint::cli::CliApp;

fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manifest_lint=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let matches = CliApp::app().get_matches();

    // Run the CLI application
    CliApp::run(&matches).map(ExitCode::from)
}
