//! Loan risk assistant CLI: the main entry point.
//!
//! Commands:
//! - `assess`: Assess an application against the demo collaborators
//! - `run`:    Same assessment, driven through the tool adapter layer
//! - `tools`:  List the tool definitions
//! - `config`: Print the effective configuration

use clap::{Parser, Subcommand};
use loanrisk_config::{AppConfig, LoggingConfig};
use std::path::PathBuf;

mod commands;
mod demo;

#[derive(Parser)]
#[command(
    name = "loanrisk",
    about = "Loan risk assistant: policy-grounded risk assessments with a governance trail",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to ~/.loanrisk/config.toml)
    #[arg(short, long, global = true, env = "LOANRISK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a loan application JSON file (or the built-in sample)
    Assess {
        /// Application JSON file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Assess through the tool adapter layer and print the merged response
    Run {
        /// Application JSON file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List the tools exposed to a tool host
    Tools,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;

    init_tracing(cli.verbose, &config.logging);

    match cli.command {
        Commands::Assess { input } => commands::assess::run(&config, input.as_deref()).await?,
        Commands::Run { input } => commands::run::run(&config, input.as_deref()).await?,
        Commands::Tools => commands::tools::run()?,
        Commands::Config => commands::config_cmd::show(&config, cli.config.as_deref())?,
    }

    Ok(())
}

/// `RUST_LOG` wins, then `--verbose`, then `logging.level` from config.
fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Logs go to stderr so stdout stays parseable JSON.
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
