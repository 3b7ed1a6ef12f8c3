//! JSON document catalog
//!
//! One JSON array per collection in a data directory. Writes are staged on a
//! copy of the catalog, persisted, and only then committed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    catalog::{
        CatalogError, CatalogReader, CatalogStore, Collections, Stored,
        models::{Announcement, Category, Color, PricingTable, Product, Promotion, User},
        records::Table,
        seed,
    },
    ids::TypedId,
    persistence,
};

/// Catalog mirrored to JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct DocumentCatalog {
    dir: PathBuf,
    collections: Collections,
}

impl DocumentCatalog {
    /// Open the catalog in `dir`, initialising missing documents from the seed.
    ///
    /// Documents that cannot be read or decoded are replaced in memory by the
    /// seed collection and logged; they are not overwritten until the next write.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] if the bundled seed cannot be decoded.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let dir = dir.into();
        let seeded = seed::collections()?;

        let collections = Collections::new(
            load_or_seed::<User>(&dir, &seeded),
            load_or_seed::<Category>(&dir, &seeded),
            load_or_seed::<Color>(&dir, &seeded),
            load_or_seed::<Product>(&dir, &seeded),
            load_or_seed::<PricingTable>(&dir, &seeded),
            load_or_seed::<Promotion>(&dir, &seeded),
            load_or_seed::<Announcement>(&dir, &seeded),
        );

        Ok(Self { dir, collections })
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write<R: Stored, T>(
        &mut self,
        op: impl FnOnce(&mut Collections) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        let mut staged = self.collections.clone();
        let out = op(&mut staged)?;

        if let Some(document) = R::DOCUMENT {
            save::<R>(&self.dir.join(document), &staged)?;
        }

        self.collections = staged;

        Ok(out)
    }
}

fn save<R: Stored>(path: &Path, collections: &Collections) -> Result<(), CatalogError> {
    let rows: Vec<&R> = R::table(collections).rows().collect();

    persistence::write_json(path, &rows)?;

    debug!(path = %path.display(), rows = rows.len(), "wrote catalog document");

    Ok(())
}

fn load_or_seed<R: Stored>(dir: &Path, seeded: &Collections) -> Table<R> {
    let seed_table = || R::table(seeded).clone();

    let Some(document) = R::DOCUMENT else {
        return seed_table();
    };

    let path = dir.join(document);

    match persistence::read_json::<Vec<R>>(&path) {
        Ok(Some(rows)) => Table::from_rows(rows),
        Ok(None) => {
            if let Err(error) = save::<R>(&path, seeded) {
                warn!(%error, document, "could not initialise catalog document");
            }

            seed_table()
        }
        Err(error) => {
            warn!(%error, document, "unreadable catalog document, using seed data");

            seed_table()
        }
    }
}

impl CatalogReader for DocumentCatalog {
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

impl CatalogStore for DocumentCatalog {
    fn create<R: Stored>(&mut self, new: R::New) -> Result<R, CatalogError> {
        self.write::<R, _>(|collections| collections.create(new))
    }

    fn update<R: Stored>(&mut self, id: TypedId<R>, update: R::Update) -> Result<R, CatalogError> {
        self.write::<R, _>(|collections| collections.update(id, update))
    }

    fn delete<R: Stored>(&mut self, id: TypedId<R>) -> Result<(), CatalogError> {
        self.write::<R, _>(|collections| collections.delete(id))
    }
}
