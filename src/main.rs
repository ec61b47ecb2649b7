//! Dorky CLI
//!
//! Command-line interface for the dorky artifact client.

use anyhow::Result;
use clap::Parser;
use dorky_client::cli::{commands, context::CliContext, Cli, Commands};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    CliContext::set(CliContext {
        verbose: cli.verbose,
        quiet: cli.quiet,
        json: cli.json,
        no_progress: cli.no_progress,
    });

    let client = commands::build_client(cli.server.as_deref(), cli.config.as_deref())?;

    // Execute the command
    match cli.command {
        Commands::Upload {
            file,
            meta,
            idempotency_key,
        } => commands::upload::execute(&client, file, meta, idempotency_key),
        Commands::Download { id, dest } => commands::download::execute(&client, id, dest),
        Commands::Info { id } => commands::info::execute(&client, id),
    }
}
