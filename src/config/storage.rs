//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where the catalog documents and the cart snapshot live.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the catalog JSON documents
    #[arg(long, env = "VITRINE_DATA_DIR", default_value = ".vitrine/catalog")]
    pub data_dir: PathBuf,

    /// Cart snapshot file
    #[arg(long, env = "VITRINE_CART_PATH", default_value = ".vitrine/cart.json")]
    pub cart_path: PathBuf,
}
