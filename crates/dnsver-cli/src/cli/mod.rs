//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Create context for commands
    let ctx = commands::Context::new(config, cli.data_dir);
    tracing::debug!(data_dir = %ctx.paths.data_dir().display(), "configuration loaded");

    // Dispatch to appropriate command
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(&ctx, args).await,
        Commands::Probe(args) => commands::probe::execute(&ctx, args).await,
        Commands::Collect(args) => commands::collect::execute(&ctx, args).await,
        Commands::Plan(args) => commands::plan::execute(&ctx, &args),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true);

    let installed = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}
