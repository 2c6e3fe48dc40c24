//! CLI command definitions and dispatch.

pub mod calc;
pub mod config;
pub mod replay;
pub mod tree;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use gridstudy_core::config::AppConfig;
use gridstudy_core::error::{AppError, ErrorKind};

/// GridStudy: offline replay of directory trees, equipment caches, and notifications
#[derive(Debug, Parser)]
#[command(name = "gridstudy", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default` and per-environment configuration files
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build and print the directory tree of a fixture
    Tree(tree::TreeArgs),
    /// Compute calculation rows over spreadsheet rows
    Calc(calc::CalcArgs),
    /// Replay notifications against a fixture-loaded equipment cache
    Replay(replay::ReplayArgs),
    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Tree(args) => tree::execute(args, config, self.format).await,
            Commands::Calc(args) => calc::execute(args, self.format),
            Commands::Replay(args) => replay::execute(args, config, self.format).await,
            Commands::Config => config::execute(config, self.format),
        }
    }
}

/// Helper: read a JSON document from a file
pub fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read '{}'", path.display()),
            e,
        )
    })?;
    Ok(serde_json::from_str(&text)?)
}
