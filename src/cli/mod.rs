//! CLI module for IFEval-FC
//!
//! Subcommands:
//! - `evaluate`: run a dataset against a provider and store the report
//! - `checkers`: list checker kinds with their parameters
//! - `check`: run one checker against a value
//! - `validate`: load a dataset without calling any provider
//! - `summarize`: aggregate a stored report

pub mod check;
pub mod evaluate;
pub mod summarize;
pub mod table;
pub mod validate;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::{self, LoggingConfig};

/// Exit code for a run stopped by Ctrl+C
pub const EXIT_CANCELLED: u8 = 130;
/// Exit code for a run aborted by the provider (e.g. rejected credentials)
pub const EXIT_ABORTED: u8 = 3;

/// IFEval-FC - format-instruction following in LLM function calls
#[derive(Parser)]
#[command(name = "ifeval-fc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and local.toml
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a provider on a dataset
    Evaluate(evaluate::EvaluateArgs),

    /// List available checkers
    Checkers(check::CheckersArgs),

    /// Run a single checker against a value
    Check(check::CheckArgs),

    /// Load and validate a dataset
    Validate(validate::ValidateArgs),

    /// Aggregate a stored run report
    Summarize(summarize::SummarizeArgs),
}

/// Dispatch the parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli.config_dir)?;

    match cli.command {
        Command::Evaluate(args) => evaluate::run(args, &config).await,
        Command::Checkers(args) => check::list(args),
        Command::Check(args) => check::run(args),
        Command::Validate(args) => validate::run(args, &config).await,
        Command::Summarize(args) => summarize::run(args, &config).await,
    }
}

fn load_config(dir: &Path) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_from(dir)
        .with_context(|| format!("failed to load configuration from '{}'", dir.display()))?;
    logging::init_logging(&LoggingConfig::from(&config.logging));

    Ok(config)
}
