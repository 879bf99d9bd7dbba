//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mathkid")]
#[command(
    author,
    version,
    about = "Solve a math question from text or a photo, with a simple visual example for kids"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the expression, show an example and give the answer
    Solve(InputArgs),

    /// Report whether the input is read as text or as an image (offline)
    Classify(InputArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Math question, e.g. "How much is 2 + 2 * 3?"
    pub question: Vec<String>,

    /// Photo or scan of the question (PNG/JPEG); wins over typed text
    #[arg(short, long)]
    pub image: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (API key masked)
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
    Md,
}
