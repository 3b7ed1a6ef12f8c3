//! In-memory catalog

use crate::{
    catalog::{
        CatalogError, CatalogReader, CatalogStore, Collections, Stored, models::User, seed,
    },
    ids::TypedId,
};

/// Catalog held entirely in memory for the lifetime of the owning session.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    collections: Collections,
}

impl MemoryCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog preloaded with the bundled seed data.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] if the seed cannot be decoded.
    pub fn seeded() -> Result<Self, CatalogError> {
        Ok(Self::from_collections(seed::collections()?))
    }

    /// Wrap existing collections.
    #[must_use]
    pub fn from_collections(collections: Collections) -> Self {
        Self { collections }
    }
}

impl CatalogReader for MemoryCatalog {
    fn get<R: Stored>(&self, id: TypedId<R>) -> Result<R, CatalogError> {
        self.collections.get(id).cloned()
    }

    fn list<R: Stored>(&self) -> Result<Vec<R>, CatalogError> {
        Ok(self.collections.active::<R>().cloned().collect())
    }

    fn find_user(&self, username: &str) -> Result<Option<User>, CatalogError> {
        Ok(self.collections.find_user(username).cloned())
    }
}

impl CatalogStore for MemoryCatalog {
    fn create<R: Stored>(&mut self, new: R::New) -> Result<R, CatalogError> {
        self.collections.create(new)
    }

    fn update<R: Stored>(&mut self, id: TypedId<R>, update: R::Update) -> Result<R, CatalogError> {
        self.collections.update(id, update)
    }

    fn delete<R: Stored>(&mut self, id: TypedId<R>) -> Result<(), CatalogError> {
        self.collections.delete(id)
    }
}
