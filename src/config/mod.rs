//! Command-line configuration

use clap::Parser;

use crate::{
    cli::Command,
    config::{
        credentials::CredentialsConfig, observability::LoggingConfig, order::OrderConfig,
        storage::StorageConfig,
    },
};

pub(crate) mod credentials;
pub(crate) mod observability;
pub(crate) mod order;
pub(crate) mod storage;

/// Vitrine shop configuration
#[derive(Debug, Parser)]
#[command(name = "vitrine", about = "Vitrine furniture ordering", long_about = None)]
pub(crate) struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog and cart locations.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Order currency and destination.
    #[command(flatten)]
    pub order: OrderConfig,

    /// Sign-in credentials.
    #[command(flatten)]
    pub credentials: CredentialsConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
