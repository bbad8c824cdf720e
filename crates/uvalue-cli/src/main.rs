//! uvalue CLI - Command-line interface
//!
//! Composes assemblies in a local draft and drives them through the
//! calculation backend.

mod cli;
mod commands;
mod config;
mod errors;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use uvalue_core::config::DEFAULT_API_BASE;

fn main() {
    // Initialize tracing; stderr keeps --json output on stdout parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;
    let api_base = cli.api_base.clone().unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    // Create async runtime and execute the command
    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(commands::execute(cli)));

    if let Err(e) = result {
        let error = errors::from_anyhow(e, &api_base);
        if json {
            OutputWriter::new(true).error(&error);
        } else {
            error.display();
        }
        std::process::exit(1);
    }
}
