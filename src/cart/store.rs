//! Cart stores

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::{
    cart::line_item::CartLineItem,
    persistence::{self, PersistenceError},
};

/// Where a cart snapshot is mirrored between sessions.
#[cfg_attr(test, mockall::automock)]
pub trait CartStore {
    /// Load the last saved snapshot. Entries that fail validation are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the snapshot cannot be read at all.
    fn load_cart(&self) -> Result<Vec<CartLineItem>, PersistenceError>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the snapshot cannot be written.
    fn save_cart(&mut self, items: &[CartLineItem]) -> Result<(), PersistenceError>;
}

/// Snapshot kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    items: Vec<CartLineItem>,
}

impl MemoryCartStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The saved snapshot.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }
}

impl CartStore for MemoryCartStore {
    fn load_cart(&self) -> Result<Vec<CartLineItem>, PersistenceError> {
        Ok(self.items.clone())
    }

    fn save_cart(&mut self, items: &[CartLineItem]) -> Result<(), PersistenceError> {
        self.items = items.to_vec();

        Ok(())
    }
}

/// Snapshot kept as a JSON array in a file.
#[derive(Debug, Clone)]
pub struct JsonFileCartStore {
    path: PathBuf,
}

impl JsonFileCartStore {
    /// Store the snapshot at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for JsonFileCartStore {
    fn load_cart(&self) -> Result<Vec<CartLineItem>, PersistenceError> {
        match persistence::read_text(&self.path)? {
            Some(text) => decode_snapshot(&text),
            None => Ok(Vec::new()),
        }
    }

    fn save_cart(&mut self, items: &[CartLineItem]) -> Result<(), PersistenceError> {
        persistence::write_json(&self.path, items)
    }
}

/// Decode a cart snapshot, dropping entries that do not describe a valid line item.
///
/// Line totals are recomputed from unit price and quantity.
///
/// # Errors
///
/// Returns [`PersistenceError::Json`] if the document is not a JSON array.
pub fn decode_snapshot(text: &str) -> Result<Vec<CartLineItem>, PersistenceError> {
    let entries: Vec<Value> = serde_json::from_str(text)?;

    let items = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let item = serde_json::from_value::<CartLineItem>(entry)
                .map_err(|err| err.to_string())
                .and_then(|mut item| {
                    item.validate()
                        .and_then(|()| item.set_quantity(item.quantity))
                        .map_err(|err| err.to_string())?;

                    Ok(item)
                });

            match item {
                Ok(item) => Some(item),
                Err(error) => {
                    warn!(index, %error, "dropping invalid cart entry");
                    None
                }
            }
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;
    use crate::ids::TypedId;

    fn item() -> CartLineItem {
        CartLineItem {
            product_id: TypedId::new(1),
            product_name: "Banqueta 50 cm".to_string(),
            color_id: Some(TypedId::new(2)),
            color_name: "Preto".to_string(),
            quantity: 2,
            unit_price: dec!(49.50),
            total_price: dec!(99.00),
            image: None,
        }
    }

    #[test]
    fn file_store_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = JsonFileCartStore::new(dir.path().join("cart.json"));

        assert!(store.load_cart()?.is_empty(), "missing file is an empty cart");

        store.save_cart(&[item()])?;

        assert_eq!(store.load_cart()?, vec![item()]);

        Ok(())
    }

    #[test]
    fn decode_drops_invalid_entries() -> TestResult {
        let text = r#"[
            {"productId":1,"productName":"Banqueta 50 cm","colorId":2,"colorName":"Preto",
             "quantity":2,"unitPrice":"49.50","totalPrice":"99.00"},
            {"productId":2,"productName":"Banqueta 70 cm","colorName":"Preto",
             "quantity":0,"unitPrice":"55.00","totalPrice":"0"},
            {"productId":"oops"},
            42
        ]"#;

        let items = decode_snapshot(text)?;

        assert_eq!(items, vec![item()]);

        Ok(())
    }

    #[test]
    fn decode_recomputes_tampered_totals() -> TestResult {
        let text = r#"[{"productId":1,"productName":"Banqueta 50 cm","colorId":2,
            "colorName":"Preto","quantity":3,"unitPrice":"10.00","totalPrice":"1.00"}]"#;

        let items = decode_snapshot(text)?;

        assert_eq!(items.first().map(|item| item.total_price), Some(dec!(30.00)));

        Ok(())
    }

    #[test]
    fn decode_drops_entries_with_out_of_range_totals() -> TestResult {
        let text = r#"[
            {"productId":1,"productName":"Banqueta 50 cm","colorName":"Preto","quantity":100,
             "unitPrice":"10000000000000000000000000000","totalPrice":"1"},
            {"productId":1,"productName":"Banqueta 50 cm","colorId":2,"colorName":"Preto",
             "quantity":2,"unitPrice":"49.50","totalPrice":"99.00"}
        ]"#;

        let items = decode_snapshot(text)?;

        assert_eq!(items, vec![item()]);

        Ok(())
    }

    #[test]
    fn decode_rejects_non_array_documents() {
        assert!(matches!(
            decode_snapshot("{\"cart\":[]}"),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn memory_store_keeps_last_snapshot() -> TestResult {
        let mut store = MemoryCartStore::new();

        store.save_cart(&[item()])?;
        store.save_cart(&[])?;

        assert!(store.items().is_empty());
        assert!(store.load_cart()?.is_empty());

        Ok(())
    }
}
