//! Cart
//!
//! Line items in insertion order. Adding a product and color already in the
//! cart merges into the existing line, keeping the unit price captured on the
//! first add. Every change is mirrored to the cart store on a best-effort basis.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::models::{ColorId, ProductId},
    order::currency::format_amount,
    validation::ValidationError,
};

pub mod line_item;
pub mod store;

pub use line_item::{CartLineItem, LineItemInput, line_total, sum_line_totals};
pub use store::{CartStore, JsonFileCartStore, MemoryCartStore};

/// Cart mutation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The item was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No line item at that position.
    #[error("item {0} not found")]
    ItemNotFound(usize),
}

/// Aggregate figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartStats {
    /// Units across all lines.
    pub item_count: u64,

    /// Sum of line totals.
    pub total: Decimal,

    /// Number of lines.
    pub unique_products: usize,

    /// Total divided by units, half-up to cents; zero for an empty cart.
    pub average_item_price: Decimal,

    /// Whether the cart has no lines.
    pub is_empty: bool,
}

/// Cart
#[derive(Debug)]
pub struct Cart<S: CartStore = MemoryCartStore> {
    items: Vec<CartLineItem>,
    total: Decimal,
    currency: &'static Currency,
    store: S,
    degraded: bool,
}

impl<S: CartStore> Cart<S> {
    /// An empty cart that will mirror its changes to `store`.
    pub fn new(store: S, currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
            currency,
            store,
            degraded: false,
        }
    }

    /// Restore the cart last saved to `store`.
    ///
    /// An unreadable snapshot starts an empty cart and marks persistence as
    /// degraded. Lines that would push the cart total out of range are dropped.
    pub fn load(store: S, currency: &'static Currency) -> Self {
        let mut cart = Self::new(store, currency);

        match cart.store.load_cart() {
            Ok(items) => {
                debug!(lines = items.len(), "restored cart");

                for item in items {
                    match cart.total.checked_add(item.total_price) {
                        Some(total) => {
                            cart.total = total;
                            cart.items.push(item);
                        }
                        None => warn!(product = %item.product_id, "dropping cart line, total out of range"),
                    }
                }
            }
            Err(error) => {
                warn!(%error, "could not restore cart, starting empty");
                cart.degraded = true;
            }
        }

        cart
    }

    /// Add units of a product, merging with an existing line for the same
    /// product and color.
    ///
    /// A merged line keeps its original unit price; only the quantity and
    /// line total change.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] if the input is invalid or the line
    /// or cart total would be out of range. The cart is unchanged on error.
    pub fn add(&mut self, input: LineItemInput) -> Result<&CartLineItem, CartError> {
        let item = input.into_line_item()?;

        let index = match self
            .items
            .iter()
            .position(|line| line.is_for(item.product_id, item.color_id))
        {
            Some(index) => {
                let quantity = self.get(index)?.quantity.saturating_add(item.quantity);
                self.resize(index, quantity)?;

                index
            }
            None => {
                self.total = self
                    .total
                    .checked_add(item.total_price)
                    .ok_or(ValidationError::AmountOverflow)?;
                self.items.push(item);

                self.items.len() - 1
            }
        };

        self.persist();

        self.get(index)
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no line at `index`.
    pub fn remove(&mut self, index: usize) -> Result<CartLineItem, CartError> {
        let total = self
            .total
            .checked_sub(self.get(index)?.total_price)
            .ok_or(ValidationError::AmountOverflow)?;

        let removed = self.items.remove(index);
        self.total = total;

        self.persist();

        Ok(removed)
    }

    /// Set the quantity of the line at `index`; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no line at `index`, or
    /// [`CartError::Validation`] if the new total would be out of range. The
    /// cart is unchanged on error.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove(index)?;

            return Ok(());
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        self.resize(index, quantity)?;
        self.persist();

        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
        self.persist();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// [`Cart::total`] in the cart's currency.
    #[must_use]
    pub fn total_money(&self) -> Money<'static, Currency> {
        Money::from_decimal(self.total(), self.currency)
    }

    /// Units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether a line exists for `product` in `color`.
    #[must_use]
    pub fn contains(&self, product: ProductId, color: Option<ColorId>) -> bool {
        self.items.iter().any(|item| item.is_for(product, color))
    }

    /// The line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no line at `index`.
    pub fn get(&self, index: usize) -> Result<&CartLineItem, CartError> {
        self.items.get(index).ok_or(CartError::ItemNotFound(index))
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency used for display.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the last load or save failed, leaving the cart memory-only.
    #[must_use]
    pub fn is_persistence_degraded(&self) -> bool {
        self.degraded
    }

    /// Aggregate figures.
    #[must_use]
    pub fn stats(&self) -> CartStats {
        let item_count = self.item_count();
        let total = self.total();

        let average_item_price = if item_count == 0 {
            Decimal::ZERO
        } else {
            (total / Decimal::from(item_count))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        CartStats {
            item_count,
            total,
            unique_products: self.items.len(),
            average_item_price,
            is_empty: self.items.is_empty(),
        }
    }

    /// One-line summary such as `3 itens - R$ 150,00`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "Carrinho vazio".to_string();
        }

        let count = self.item_count();
        let noun = if count == 1 { "item" } else { "itens" };

        format!("{count} {noun} - {}", format_amount(self.total(), self.currency))
    }

    /// Print the cart as a table followed by the summary line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        if self.is_empty() {
            return writeln!(out, "{}", self.summary());
        }

        let mut builder = Builder::default();

        builder.push_record(["#", "Produto", "Cor", "Qtd", "Preço unitário", "Subtotal"]);

        for (index, item) in self.items.iter().enumerate() {
            builder.push_record([
                (index + 1).to_string(),
                item.product_name.clone(),
                item.color_name.clone(),
                item.quantity.to_string(),
                format_amount(item.unit_price, self.currency),
                format_amount(item.total_price, self.currency),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, "{}", self.summary())
    }

    fn resize(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        let line = self.get(index)?;
        let resized = line_total(line.unit_price, quantity)?;
        let total = self
            .total
            .checked_sub(line.total_price)
            .and_then(|rest| rest.checked_add(resized))
            .ok_or(ValidationError::AmountOverflow)?;

        self.items
            .get_mut(index)
            .ok_or(CartError::ItemNotFound(index))?
            .set_quantity(quantity)?;
        self.total = total;

        Ok(())
    }

    fn persist(&mut self) {
        match self.store.save_cart(&self.items) {
            Ok(()) => self.degraded = false,
            Err(error) => {
                warn!(%error, "could not save cart, keeping it in memory");
                self.degraded = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use rust_decimal::dec;
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use super::{store::MockCartStore, *};
    use crate::{ids::TypedId, persistence::PersistenceError};

    fn input(product: u32, color: Option<u32>, quantity: u32, unit_price: Decimal) -> LineItemInput {
        LineItemInput {
            product_id: TypedId::new(product),
            product_name: format!("Produto {product}"),
            color_id: color.map(TypedId::new),
            color_name: color.map(|color| format!("Cor {color}")),
            quantity,
            unit_price,
            image: None,
            color_required: false,
        }
    }

    fn cart() -> Cart {
        Cart::new(MemoryCartStore::new(), BRL)
    }

    fn assert_total_matches_lines(cart: &Cart<impl CartStore>) {
        let sum: Decimal = cart.iter().map(|item| item.total_price).sum();

        assert_eq!(cart.total(), sum);
    }

    #[test]
    fn repeated_add_merges_and_keeps_first_price() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, Some(2), 2, dec!(49.50)))?;
        let merged = cart.add(input(1, Some(2), 3, dec!(60.00)))?.clone();

        assert_eq!(cart.len(), 1);
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.unit_price, dec!(49.50));
        assert_eq!(merged.total_price, dec!(247.50));

        Ok(())
    }

    #[test]
    fn different_color_is_a_new_line() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, Some(1), 1, dec!(45.00)))?;
        cart.add(input(1, Some(2), 1, dec!(45.00)))?;
        cart.add(input(2, None, 1, dec!(55.00)))?;

        assert_eq!(cart.len(), 3);
        assert!(cart.contains(TypedId::new(1), Some(TypedId::new(2))));
        assert!(cart.contains(TypedId::new(2), None));
        assert!(!cart.contains(TypedId::new(2), Some(TypedId::new(1))));

        Ok(())
    }

    #[test]
    fn invalid_add_leaves_cart_unchanged() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, Some(2), 1, dec!(45.00)))?;

        let result = cart.add(input(1, Some(2), 0, dec!(45.00)));

        assert_eq!(
            result.err(),
            Some(CartError::Validation(ValidationError::NonPositiveQuantity(0)))
        );
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn update_to_zero_removes_line() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, None, 2, dec!(10.00)))?;
        cart.add(input(2, None, 1, dec!(30.00)))?;

        let before = cart.total();
        let removed_total = cart.get(0)?.total_price;

        cart.update_quantity(0, 0)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), before - removed_total);

        cart.update_quantity(0, -3)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_recomputes_from_stored_price() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, None, 2, dec!(12.34)))?;
        cart.update_quantity(0, 7)?;

        assert_eq!(cart.get(0)?.total_price, dec!(86.38));
        assert_eq!(cart.item_count(), 7);

        Ok(())
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        let mut cart = cart();

        assert_eq!(cart.remove(0), Err(CartError::ItemNotFound(0)));
        assert_eq!(cart.update_quantity(3, 1), Err(CartError::ItemNotFound(3)));
        assert_eq!(cart.update_quantity(3, 0), Err(CartError::ItemNotFound(3)));
    }

    #[test]
    fn total_tracks_every_mutation() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, Some(1), 3, dec!(45.00)))?;
        assert_total_matches_lines(&cart);

        cart.add(input(2, Some(4), 2, dec!(63.25)))?;
        assert_total_matches_lines(&cart);

        cart.add(input(1, Some(1), 1, dec!(99.99)))?;
        assert_total_matches_lines(&cart);

        cart.update_quantity(1, 5)?;
        assert_total_matches_lines(&cart);

        cart.remove(0)?;
        assert_total_matches_lines(&cart);

        assert_eq!(cart.total(), dec!(316.25));

        Ok(())
    }

    #[test]
    fn out_of_range_totals_leave_cart_unchanged() -> TestResult {
        let mut cart = cart();
        let huge = dec!(10000000000000000000000000000);

        cart.add(input(1, None, 2, huge))?;

        assert_eq!(
            cart.add(input(1, None, 98, huge)).err(),
            Some(CartError::Validation(ValidationError::AmountOverflow))
        );
        assert_eq!(
            cart.update_quantity(0, i64::MAX).err(),
            Some(CartError::Validation(ValidationError::AmountOverflow))
        );
        assert_eq!(
            cart.add(input(2, None, 7, huge)).err(),
            Some(CartError::Validation(ValidationError::AmountOverflow))
        );

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), huge * dec!(2));
        assert_eq!(cart.store().items(), cart.items());

        Ok(())
    }

    #[test]
    fn load_drops_lines_beyond_total_range() -> TestResult {
        let huge = dec!(50000000000000000000000000000);
        let line = |product: u32| -> Result<CartLineItem, ValidationError> {
            input(product, None, 1, huge).into_line_item()
        };

        let mut store = MockCartStore::new();
        let items = vec![line(1)?, line(2)?];

        store.expect_load_cart().returning(move || Ok(items.clone()));

        let cart = Cart::load(store, BRL);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), huge);

        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, None, 1, dec!(10.00)))?;
        cart.clear();

        assert!(cart.is_empty());

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.store().items().is_empty());

        Ok(())
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, None, 1, dec!(10.00)))?;
        assert_eq!(cart.store().items(), cart.items());

        cart.update_quantity(0, 4)?;
        assert_eq!(cart.store().items(), cart.items());

        Ok(())
    }

    #[test]
    fn load_restores_saved_snapshot() -> TestResult {
        let mut first = cart();
        first.add(input(1, Some(2), 2, dec!(45.00)))?;

        let restored = Cart::load(first.store().clone(), BRL);

        assert_eq!(restored.items(), first.items());
        assert!(!restored.is_persistence_degraded());

        Ok(())
    }

    #[test]
    fn save_failure_keeps_cart_in_memory() -> TestResult {
        let mut store = MockCartStore::new();

        store
            .expect_save_cart()
            .times(2)
            .returning(|_| Err(PersistenceError::Io(io::Error::from(ErrorKind::PermissionDenied))));

        let mut cart = Cart::new(store, BRL);

        cart.add(input(1, None, 2, dec!(10.00)))?;
        cart.add(input(1, None, 1, dec!(10.00)))?;

        assert_eq!(cart.item_count(), 3);
        assert!(cart.is_persistence_degraded());

        Ok(())
    }

    #[test]
    fn load_failure_starts_empty_and_degraded() {
        let mut store = MockCartStore::new();

        store
            .expect_load_cart()
            .returning(|| Err(PersistenceError::Io(io::Error::from(ErrorKind::PermissionDenied))));

        let cart = Cart::load(store, BRL);

        assert!(cart.is_empty());
        assert!(cart.is_persistence_degraded());
    }

    #[test]
    fn stats_and_summary() -> TestResult {
        let mut cart = cart();

        assert_eq!(cart.summary(), "Carrinho vazio");
        assert_eq!(cart.stats().average_item_price, Decimal::ZERO);

        cart.add(input(1, None, 1, dec!(45.00)))?;

        assert_eq!(cart.summary(), "1 item - R$ 45,00");

        cart.add(input(2, None, 2, dec!(52.50)))?;

        let stats = cart.stats();

        assert_eq!(stats.item_count, 3);
        assert_eq!(stats.total, dec!(150.00));
        assert_eq!(stats.unique_products, 2);
        assert_eq!(stats.average_item_price, dec!(50.00));
        assert!(!stats.is_empty);
        assert_eq!(cart.summary(), "3 itens - R$ 150,00");
        assert_eq!(cart.total_money(), Money::from_decimal(dec!(150.00), BRL));

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let mut cart = cart();

        cart.add(input(1, Some(2), 2, dec!(1234.50)))?;

        let mut out = Vec::new();
        cart.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Produto 1"));
        assert!(output.contains("Cor 2"));
        assert!(output.contains("R$ 1.234,50"));
        assert!(output.contains("2 itens - R$ 2.469,00"));

        Ok(())
    }

    #[test]
    fn write_to_on_empty_cart_prints_summary_only() -> TestResult {
        let mut out = Vec::new();
        cart().write_to(&mut out)?;

        assert_eq!(String::from_utf8(out)?, "Carrinho vazio\n");

        Ok(())
    }
}
