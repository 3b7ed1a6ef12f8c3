//! Order Config

use clap::Args;

/// Order rendering and dispatch settings.
#[derive(Debug, Args)]
pub(crate) struct OrderConfig {
    /// ISO 4217 currency code prices are shown in
    #[arg(long, env = "VITRINE_CURRENCY", default_value = "BRL")]
    pub currency: String,

    /// Phone number orders are sent to
    #[arg(long, env = "VITRINE_WHATSAPP_NUMBER", default_value = "5511999999999")]
    pub whatsapp_number: String,
}
