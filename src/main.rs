//! Vitrine command-line shop

use std::process::ExitCode;

use tracing::error;

use crate::config::AppConfig;

mod cli;
mod config;
mod logging;

/// Vitrine entry point
pub fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            _ = error.print();

            return ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(1));
        }
    };

    if let Err(error) = logging::init_subscriber(&config.logging) {
        eprintln!("Logging error: {error}");

        return ExitCode::FAILURE;
    }

    match cli::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");
            eprintln!("{message}");

            ExitCode::FAILURE
        }
    }
}
