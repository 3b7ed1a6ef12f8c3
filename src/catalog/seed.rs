//! Seed data

use serde::Deserialize;

use crate::{
    catalog::{
        Collections,
        models::{Announcement, Category, Color, PricingTable, Product, Promotion, User},
        records::Table,
    },
    persistence::PersistenceError,
};

/// Bundled default catalog.
pub const CATALOG_YAML: &str = include_str!("../../fixtures/catalog.yml");

/// Seed file layout
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SeedFixture {
    #[serde(default)]
    users: Vec<User>,

    #[serde(default)]
    categories: Vec<Category>,

    #[serde(default)]
    colors: Vec<Color>,

    #[serde(default)]
    products: Vec<Product>,

    #[serde(default)]
    pricing_tables: Vec<PricingTable>,

    #[serde(default)]
    promotions: Vec<Promotion>,

    #[serde(default)]
    announcements: Vec<Announcement>,
}

/// Decode the bundled seed catalog.
///
/// # Errors
///
/// Returns [`PersistenceError::Yaml`] if the bundled fixture is malformed.
pub fn collections() -> Result<Collections, PersistenceError> {
    parse(CATALOG_YAML)
}

/// Decode a seed catalog from YAML.
///
/// # Errors
///
/// Returns [`PersistenceError::Yaml`] if the document does not match the seed layout.
pub fn parse(yaml: &str) -> Result<Collections, PersistenceError> {
    let fixture: SeedFixture = serde_norway::from_str(yaml)?;

    Ok(Collections::new(
        Table::from_rows(fixture.users),
        Table::from_rows(fixture.categories),
        Table::from_rows(fixture.colors),
        Table::from_rows(fixture.products),
        Table::from_rows(fixture.pricing_tables),
        Table::from_rows(fixture.promotions),
        Table::from_rows(fixture.announcements),
    ))
}
