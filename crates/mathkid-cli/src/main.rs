//! Mathkid CLI
//!
//! Type or photograph a math question; get the expression, a picture-like
//! example and the answer.

use anyhow::Result;
use clap::Parser;
use mathkid_core::error::exit_codes;
use mathkid_core::{Config, MathKidError};

mod app;
mod commands;
mod output;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(err) = run(cli).await {
        let code = match err.downcast_ref::<MathKidError>() {
            Some(e @ MathKidError::EmptyInput(_)) => {
                eprintln!("Warning: {}", e);
                e.exit_code()
            }
            Some(e) => {
                eprintln!("Error: {:#}", err);
                e.exit_code()
            }
            None => {
                eprintln!("Error: {:#}", err);
                exit_codes::GENERAL_ERROR
            }
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Solve(args) => commands::solve::run(args, &config, cli.format, cli.verbose).await,
        Commands::Classify(args) => commands::classify::run(args, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config, cli.format).await,
    }
}
