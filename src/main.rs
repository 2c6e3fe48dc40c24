//! GridStudy CLI entry point.

use clap::Parser;

mod commands;
mod output;

use commands::Cli;
use gridstudy_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env = std::env::var("GRIDSTUDY_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&cli.config_dir, &env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    gridstudy::logging::init(&config.logging);
    tracing::debug!("Configuration loaded from '{}' (env: {})", cli.config_dir, env);

    if let Err(e) = cli.execute(&config).await {
        tracing::error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
