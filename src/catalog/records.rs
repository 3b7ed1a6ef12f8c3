//! Catalog records

use std::{collections::BTreeMap, fmt::Debug};

use serde::{Serialize, de::DeserializeOwned};

use crate::{ids::TypedId, validation::ValidationError};

/// A catalog record with typed create and partial-update requests.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + 'static {
    /// Create request.
    type New;

    /// Partial update request; `None` fields are left untouched.
    type Update;

    /// Entity name used in lookup errors.
    const ENTITY: &'static str;

    /// Record id.
    fn id(&self) -> TypedId<Self>;

    /// Whether the record is visible in listings.
    fn is_active(&self) -> bool;

    /// Soft-delete the record.
    fn deactivate(&mut self);

    /// Validate a create request and build the record under `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the request is invalid.
    fn build(id: TypedId<Self>, new: Self::New) -> Result<Self, ValidationError>;

    /// Validate and merge a partial update.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the merged record would be invalid. The
    /// record is left unchanged on error.
    fn apply(&mut self, update: Self::Update) -> Result<(), ValidationError>;
}

/// Rows of one record type keyed by id, in id order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<TypedId<T>, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    /// Build a table from existing rows; later duplicates replace earlier ones.
    pub fn from_rows(rows: impl IntoIterator<Item = T>) -> Self {
        Self {
            rows: rows.into_iter().map(|row| (row.id(), row)).collect(),
        }
    }

    /// The id the next created row will receive, or `None` once the highest
    /// id is `u32::MAX`.
    #[must_use]
    pub fn next_id(&self) -> Option<TypedId<T>> {
        let last = self.rows.keys().next_back().map_or(0, |id| id.get());

        last.checked_add(1).map(TypedId::new)
    }

    /// Look up a row regardless of its active flag.
    pub fn get(&self, id: TypedId<T>) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: TypedId<T>) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Insert or replace a row.
    pub fn insert(&mut self, row: T) {
        self.rows.insert(row.id(), row);
    }

    /// Active rows in id order.
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.rows.values().filter(|row| row.is_active())
    }

    /// All rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Number of rows, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
