//! Catalog
//!
//! Record types plus the uniform CRUD contract shared by the in-memory store
//! and the JSON document store. Listings only return active records; `get`
//! returns a record whatever its active flag.

use thiserror::Error;
use tracing::info;

use crate::{
    ids::TypedId,
    persistence::PersistenceError,
    segments::Segment,
    validation::ValidationError,
};

pub mod documents;
pub mod hex;
pub mod memory;
pub mod models;
pub mod records;
pub mod seed;

pub use documents::DocumentCatalog;
pub use memory::MemoryCatalog;

use models::{
    Announcement, Category, CategoryId, Color, PricingTable, Product, Promotion, User,
};
use records::{Record, Table};

/// Catalog read and write failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No record with that id.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Record type.
        entity: &'static str,
        /// Requested id.
        id: u32,
    },

    /// Every id of the record type is taken.
    #[error("no free {entity} ids left")]
    IdsExhausted {
        /// Record type.
        entity: &'static str,
    },

    /// The request was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backing documents could not be read or written.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl CatalogError {
    /// `NotFound` for a typed id.
    #[must_use]
    pub fn not_found<R: Record>(id: TypedId<R>) -> Self {
        Self::NotFound {
            entity: R::ENTITY,
            id: id.get(),
        }
    }
}

/// A record type held in [`Collections`].
pub trait Stored: Record {
    /// JSON document the collection is kept in, if it is persisted at all.
    const DOCUMENT: Option<&'static str>;

    /// The collection holding this record type.
    fn table(collections: &Collections) -> &Table<Self>;

    /// Mutable access to the collection.
    fn table_mut(collections: &mut Collections) -> &mut Table<Self>;

    /// Check that ids this record points at exist.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for a dangling reference.
    fn check_references(&self, _collections: &Collections) -> Result<(), CatalogError> {
        Ok(())
    }
}

/// Every catalog collection, keyed by typed id.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    users: Table<User>,
    categories: Table<Category>,
    colors: Table<Color>,
    products: Table<Product>,
    pricing_tables: Table<PricingTable>,
    promotions: Table<Promotion>,
    announcements: Table<Announcement>,
}

impl Collections {
    /// Assemble collections from per-type tables.
    #[must_use]
    pub fn new(
        users: Table<User>,
        categories: Table<Category>,
        colors: Table<Color>,
        products: Table<Product>,
        pricing_tables: Table<PricingTable>,
        promotions: Table<Promotion>,
        announcements: Table<Announcement>,
    ) -> Self {
        Self {
            users,
            categories,
            colors,
            products,
            pricing_tables,
            promotions,
            announcements,
        }
    }

    /// Look up a record regardless of its active flag.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn get<R: Stored>(&self, id: TypedId<R>) -> Result<&R, CatalogError> {
        R::table(self)
            .get(id)
            .ok_or_else(|| CatalogError::not_found(id))
    }

    /// Active records in id order.
    pub fn active<R: Stored>(&self) -> impl Iterator<Item = &R> {
        R::table(self).active()
    }

    /// Find a user by login name, active or not.
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.rows().find(|user| user.username == username)
    }

    /// Validate and insert a new record under the next free id.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the request is invalid, references a
    /// missing record, or no id is left for the record type.
    pub fn create<R: Stored>(&mut self, new: R::New) -> Result<R, CatalogError> {
        let id = R::table(self)
            .next_id()
            .ok_or(CatalogError::IdsExhausted { entity: R::ENTITY })?;
        let record = R::build(id, new)?;

        record.check_references(self)?;
        R::table_mut(self).insert(record.clone());

        info!(entity = R::ENTITY, %id, "created catalog record");

        Ok(record)
    }

    /// Validate and merge a partial update.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for an unknown id, an invalid update or a
    /// dangling reference. The stored record is unchanged on error.
    pub fn update<R: Stored>(&mut self, id: TypedId<R>, update: R::Update) -> Result<R, CatalogError> {
        let mut record = self.get(id)?.clone();

        record.apply(update)?;
        record.check_references(self)?;
        R::table_mut(self).insert(record.clone());

        info!(entity = R::ENTITY, %id, "updated catalog record");

        Ok(record)
    }

    /// Soft-delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn delete<R: Stored>(&mut self, id: TypedId<R>) -> Result<(), CatalogError> {
        let record = R::table_mut(self)
            .get_mut(id)
            .ok_or_else(|| CatalogError::not_found(id))?;

        record.deactivate();

        info!(entity = R::ENTITY, %id, "deactivated catalog record");

        Ok(())
    }
}

impl Stored for User {
    const DOCUMENT: Option<&'static str> = None;

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.users
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.users
    }
}

impl Stored for Category {
    const DOCUMENT: Option<&'static str> = Some("categories.json");

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.categories
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.categories
    }
}

impl Stored for Color {
    const DOCUMENT: Option<&'static str> = Some("colors.json");

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.colors
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.colors
    }
}

impl Stored for Product {
    const DOCUMENT: Option<&'static str> = Some("products.json");

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.products
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.products
    }

    fn check_references(&self, collections: &Collections) -> Result<(), CatalogError> {
        if let Some(category) = self.category_id {
            collections.get(category)?;
        }

        for &color in &self.available_colors {
            collections.get(color)?;
        }

        Ok(())
    }
}

impl Stored for PricingTable {
    const DOCUMENT: Option<&'static str> = Some("pricing-tables.json");

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.pricing_tables
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.pricing_tables
    }
}

impl Stored for Promotion {
    const DOCUMENT: Option<&'static str> = Some("promotions.json");

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.promotions
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.promotions
    }
}

impl Stored for Announcement {
    const DOCUMENT: Option<&'static str> = Some("announcements.json");

    fn table(collections: &Collections) -> &Table<Self> {
        &collections.announcements
    }

    fn table_mut(collections: &mut Collections) -> &mut Table<Self> {
        &mut collections.announcements
    }
}

/// Product listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products in this category.
    pub category: Option<CategoryId>,
}

impl ProductFilter {
    /// Products in one category.
    #[must_use]
    pub fn in_category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
        }
    }

    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .is_none_or(|category| product.category_id == Some(category))
    }
}

/// Read side of the catalog.
pub trait CatalogReader {
    /// Fetch one record, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    fn get<R: Stored>(&self, id: TypedId<R>) -> Result<R, CatalogError>;

    /// Active records in id order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list<R: Stored>(&self) -> Result<Vec<R>, CatalogError>;

    /// Find a user by login name, active or not.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn find_user(&self, username: &str) -> Result<Option<User>, CatalogError>;

    /// Active products, optionally restricted to a category.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.list::<Product>()?;
        products.retain(|product| filter.matches(product));

        Ok(products)
    }

    /// Active pricing tables, optionally for one segment only.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list_pricing_tables(&self, segment: Option<Segment>) -> Result<Vec<PricingTable>, CatalogError> {
        let mut tables = self.list::<PricingTable>()?;

        if let Some(segment) = segment {
            tables.retain(|table| table.segment == segment);
        }

        Ok(tables)
    }

    /// Active colors.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list_colors(&self) -> Result<Vec<Color>, CatalogError> {
        self.list()
    }

    /// Active categories.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.list()
    }

    /// Active promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list_promotions(&self) -> Result<Vec<Promotion>, CatalogError> {
        self.list()
    }

    /// Active announcements reaching `segment`, or all of them for `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the backing store cannot be read.
    fn list_announcements(&self, segment: Option<Segment>) -> Result<Vec<Announcement>, CatalogError> {
        let mut announcements = self.list::<Announcement>()?;

        if let Some(segment) = segment {
            announcements.retain(|announcement| announcement.reaches(segment));
        }

        Ok(announcements)
    }
}

/// Write side of the catalog.
pub trait CatalogStore: CatalogReader {
    /// Create a record from a validated request.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the request is invalid, references a
    /// missing record, or cannot be persisted.
    fn create<R: Stored>(&mut self, new: R::New) -> Result<R, CatalogError>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for an unknown id, an invalid update, or a
    /// persistence failure.
    fn update<R: Stored>(&mut self, id: TypedId<R>, update: R::Update) -> Result<R, CatalogError>;

    /// Soft-delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id, or a persistence
    /// failure.
    fn delete<R: Stored>(&mut self, id: TypedId<R>) -> Result<(), CatalogError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::{models::*, *};

    fn product_request(category: u32, colors: &[u32]) -> NewProduct {
        NewProduct {
            name: "Mesa Bistrô".to_string(),
            description: None,
            category_id: Some(TypedId::new(category)),
            base_price: dec!(120.00),
            images: vec![],
            available_colors: colors.iter().copied().map(TypedId::new).collect(),
        }
    }

    fn seeded() -> Result<Collections, PersistenceError> {
        seed::collections()
    }

    #[test]
    fn create_assigns_next_id() -> TestResult {
        let mut collections = seeded()?;

        let product = collections.create::<Product>(product_request(3, &[2]))?;

        assert_eq!(product.id.get(), 3);
        assert_eq!(collections.get(product.id)?, &product);

        Ok(())
    }

    #[test]
    fn create_refuses_to_reuse_the_last_id() -> TestResult {
        let mut collections = seeded()?;
        let last = Category {
            id: TypedId::new(u32::MAX),
            name: "Última".to_string(),
            description: None,
            active: true,
        };
        Category::table_mut(&mut collections).insert(last.clone());

        let result = collections.create::<Category>(NewCategory {
            name: "Nova".to_string(),
            description: None,
        });

        assert!(matches!(
            result,
            Err(CatalogError::IdsExhausted { entity: "category" })
        ));
        assert_eq!(collections.get(last.id)?, &last);

        Ok(())
    }

    #[test]
    fn create_rejects_dangling_category_and_color() -> TestResult {
        let mut collections = seeded()?;

        let result = collections.create::<Product>(product_request(99, &[]));

        assert!(matches!(
            result,
            Err(CatalogError::NotFound {
                entity: "category",
                id: 99
            })
        ));

        let result = collections.create::<Product>(product_request(1, &[1, 42]));

        assert!(matches!(
            result,
            Err(CatalogError::NotFound {
                entity: "color",
                id: 42
            })
        ));

        Ok(())
    }

    #[test]
    fn update_with_dangling_reference_leaves_record_unchanged() -> TestResult {
        let mut collections = seeded()?;
        let id = TypedId::new(1);
        let before = collections.get::<Product>(id)?.clone();

        let result = collections.update::<Product>(
            id,
            ProductUpdate {
                available_colors: Some(smallvec![TypedId::new(77)]),
                ..ProductUpdate::default()
            },
        );

        assert!(result.is_err());
        assert_eq!(collections.get::<Product>(id)?, &before);

        Ok(())
    }

    #[test]
    fn delete_is_soft() -> TestResult {
        let mut collections = seeded()?;
        let id = TypedId::<Product>::new(1);

        collections.delete(id)?;

        assert!(!collections.get(id)?.active);
        assert!(collections.active::<Product>().all(|product| product.id != id));

        Ok(())
    }

    #[test]
    fn delete_unknown_id_is_not_found() -> TestResult {
        let mut collections = seeded()?;

        assert!(matches!(
            collections.delete(TypedId::<Color>::new(404)),
            Err(CatalogError::NotFound {
                entity: "color",
                id: 404
            })
        ));

        Ok(())
    }

    #[test]
    fn product_filter_matches_category() {
        let filter = ProductFilter::in_category(TypedId::new(1));
        let mut product = Product {
            id: TypedId::new(1),
            name: "Banqueta".to_string(),
            description: None,
            category_id: Some(TypedId::new(1)),
            base_price: dec!(10),
            images: vec![],
            available_colors: smallvec![],
            active: true,
        };

        assert!(filter.matches(&product));
        assert!(ProductFilter::default().matches(&product));

        product.category_id = None;

        assert!(!filter.matches(&product));
    }
}
