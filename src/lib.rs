pub mod ai;
pub mod cli;
mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod report;
pub mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::{AppConfig, ConfigError, DEFAULT_LOG_FILTER};
use error::AppError;

pub fn run() -> ExitCode {
    // Load .env file - current directory first, then its parent
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    // Logs go to stderr; stdout is reserved for command output
    let filter = match &config {
        Ok(c) => EnvFilter::try_new(&c.log_filter).ok(),
        Err(_) => EnvFilter::try_from_default_env().ok(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .init();

    match dispatch(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(details) = e.details() {
                eprintln!("Details: {}", details);
            }
            ExitCode::FAILURE
        }
    }
}

/// Run one subcommand. Only `analyze` needs the configuration, so a broken
/// environment does not stop the offline commands.
fn dispatch(command: Command, config: Result<AppConfig, ConfigError>) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    if let (Err(e), false) = (&config, matches!(command, Command::Analyze { .. })) {
        tracing::warn!("Ignoring configuration error: {}", e);
    }

    match command {
        Command::Extract { file } => commands::extract::run(&file),
        Command::Prompt { input, options } => {
            runtime.block_on(commands::analyze::run_prompt(&input, &options))
        }
        Command::Analyze {
            input,
            options,
            connection,
            output,
        } => {
            let config = config?.with_overrides(cli::overrides(&connection, &output));
            tracing::debug!("[Session] Using {:?}", config);
            runtime.block_on(commands::analyze::run(&input, &options, &output, &config))
        }
        Command::Models => {
            commands::models::run();
            Ok(())
        }
    }
}
