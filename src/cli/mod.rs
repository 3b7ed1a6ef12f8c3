//! Subcommands

use std::path::PathBuf;

use clap::Subcommand;
use rusty_money::iso::Currency;
use tracing::warn;
use vitrine::{
    auth,
    cart::{Cart, CartStore, JsonFileCartStore},
    catalog::{DocumentCatalog, models::User},
    order::currency::find_currency,
    session::Session,
};

use crate::config::{
    AppConfig, credentials::CredentialsConfig, order::OrderConfig, storage::StorageConfig,
};

mod admin;
mod cart;
mod catalog;
mod checkout;
mod pricing;

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Browse products, prices and news for the signed-in segment
    Catalog(catalog::CatalogArgs),

    /// Inspect and change the cart
    Cart(cart::CartCommand),

    /// Send the cart as an order and empty it
    Checkout,

    /// Manage catalog records (admin only)
    Admin(admin::AdminCommand),

    /// Pricing helpers
    Pricing(pricing::PricingCommand),
}

/// Run the configured command.
pub(crate) fn run(config: AppConfig) -> Result<(), String> {
    let AppConfig {
        storage,
        order,
        credentials,
        command,
        ..
    } = config;

    match command {
        Command::Pricing(command) => pricing::run(command, &order.currency),
        Command::Catalog(args) => catalog::run(&Context::open(storage, order, credentials)?, args),
        Command::Cart(command) => cart::run(&Context::open(storage, order, credentials)?, command),
        Command::Checkout => checkout::run(&Context::open(storage, order, credentials)?),
        Command::Admin(command) => admin::run(&mut Context::open(storage, order, credentials)?, command),
    }
}

/// Everything a signed-in command needs.
struct Context {
    catalog: DocumentCatalog,
    currency: &'static Currency,
    credentials: CredentialsConfig,
    cart_path: PathBuf,
    destination: String,
}

impl Context {
    fn open(
        storage: StorageConfig,
        order: OrderConfig,
        credentials: CredentialsConfig,
    ) -> Result<Self, String> {
        let catalog = DocumentCatalog::open(storage.data_dir)
            .map_err(|error| format!("failed to open catalog: {error}"))?;
        let currency = find_currency(&order.currency)
            .map_err(|error| format!("invalid currency: {error}"))?;

        Ok(Self {
            catalog,
            currency,
            credentials,
            cart_path: storage.cart_path,
            destination: order.whatsapp_number,
        })
    }

    fn user(&self) -> Result<User, String> {
        auth::login(&self.catalog, self.username(), self.password())
            .map_err(|error| format!("sign-in failed: {error}"))
    }

    fn session(&self) -> Result<Session<JsonFileCartStore>, String> {
        let cart = Cart::load(JsonFileCartStore::new(&self.cart_path), self.currency);

        if cart.is_persistence_degraded() {
            warn!(path = %self.cart_path.display(), "saved cart could not be read");
        }

        Session::login(&self.catalog, self.username(), self.password(), cart)
            .map_err(|error| format!("sign-in failed: {error}"))
    }

    fn username(&self) -> &str {
        self.credentials.username.as_deref().unwrap_or_default()
    }

    fn password(&self) -> &str {
        self.credentials.password.as_deref().unwrap_or_default()
    }
}

fn report_degraded<S: CartStore>(cart: &Cart<S>) {
    if cart.is_persistence_degraded() {
        eprintln!("warning: the cart could not be saved; changes last only for this run");
    }
}
