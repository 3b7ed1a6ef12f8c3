//! Credentials Config

use clap::Args;

/// Sign-in credentials for commands that act as a user.
#[derive(Debug, Args)]
pub(crate) struct CredentialsConfig {
    /// Login name
    #[arg(short, long, env = "VITRINE_USERNAME")]
    pub username: Option<String>,

    /// Password
    #[arg(short, long, env = "VITRINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}
