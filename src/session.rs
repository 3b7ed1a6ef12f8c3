//! Session
//!
//! One signed-in user and their cart. Selections are priced against the
//! catalog, added to the cart, and finally rendered and dispatched as an order.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{AuthError, login},
    cart::{Cart, CartError, CartLineItem, CartStore, LineItemInput, MemoryCartStore},
    catalog::{
        CatalogError, CatalogReader,
        models::{Color, ColorId, PricingTableId, Product, ProductId, User},
    },
    order::{Destination, DispatchError, Dispatcher, OrderError, OrderFormatter},
    pricing::{PriceOption, PricingError, price_options, resolve_price},
    segments::Segment,
    validation::ValidationError,
};

/// Failures surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The price could not be resolved.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The cart rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The order could not be rendered.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The order could not be sent; the cart is kept.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The request was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What a buyer picked on a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSelection {
    /// Product.
    pub product_id: ProductId,

    /// Color, required when the product offers colors.
    pub color_id: Option<ColorId>,

    /// Pricing table, required for store buyers.
    pub pricing_table_id: Option<PricingTableId>,

    /// Units to add.
    pub quantity: u32,
}

/// A signed-in user's shopping session.
#[derive(Debug)]
pub struct Session<S: CartStore = MemoryCartStore> {
    user: User,
    cart: Cart<S>,
    formatter: OrderFormatter,
}

impl<S: CartStore> Session<S> {
    /// Start a session for an authenticated user.
    pub fn new(user: User, cart: Cart<S>) -> Self {
        let formatter = OrderFormatter::new(cart.currency());

        Self {
            user,
            cart,
            formatter,
        }
    }

    /// Authenticate and start a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Auth`] if the credentials are rejected.
    pub fn login<C: CatalogReader>(
        catalog: &C,
        username: &str,
        password: &str,
        cart: Cart<S>,
    ) -> Result<Self, SessionError> {
        let user = login(catalog, username, password)?;

        Ok(Self::new(user, cart))
    }

    /// The signed-in user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The session's cart.
    #[must_use]
    pub fn cart(&self) -> &Cart<S> {
        &self.cart
    }

    /// Mutable access for quantity changes and removals.
    pub fn cart_mut(&mut self) -> &mut Cart<S> {
        &mut self.cart
    }

    /// The buying segment of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotABuyer`] for admins.
    pub fn segment(&self) -> Result<Segment, ValidationError> {
        self.user.segment.buyer().ok_or(ValidationError::NotABuyer)
    }

    /// Prices the user can choose from for `product`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the user cannot buy or the tables cannot be read.
    pub fn price_options<C: CatalogReader>(
        &self,
        catalog: &C,
        product: &Product,
    ) -> Result<Vec<PriceOption>, SessionError> {
        let segment = self.segment()?;
        let tables = catalog.list_pricing_tables(Some(segment))?;

        Ok(price_options(product.base_price, segment, &tables)?)
    }

    /// Unit price the user would pay for `product` under `pricing_table`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the user cannot buy, the product is
    /// unknown, or the price cannot be resolved.
    pub fn quote<C: CatalogReader>(
        &self,
        catalog: &C,
        product: ProductId,
        pricing_table: Option<PricingTableId>,
    ) -> Result<Decimal, SessionError> {
        let segment = self.segment()?;
        let product = catalog.get::<Product>(product)?;
        let tables = catalog.list_pricing_tables(Some(segment))?;

        Ok(resolve_price(product.base_price, segment, &tables, pricing_table)?)
    }

    /// Price a selection and add it to the cart.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NotABuyer`]: the user is an admin.
    /// - [`CatalogError::NotFound`]: the product or color does not exist.
    /// - [`ValidationError::InactiveProduct`]: the product has been withdrawn.
    /// - [`ValidationError::ColorUnavailable`]: the product is not offered in that color.
    /// - [`PricingError`]: the pricing table is missing or unknown.
    /// - [`CartError`]: the quantity, price or color selection is invalid.
    #[tracing::instrument(skip(self, catalog), fields(user = %self.user.id))]
    pub fn add_to_cart<C: CatalogReader>(
        &mut self,
        catalog: &C,
        selection: ItemSelection,
    ) -> Result<&CartLineItem, SessionError> {
        let segment = self.segment()?;
        let product = catalog.get::<Product>(selection.product_id)?;

        if !product.active {
            return Err(ValidationError::InactiveProduct(product.id.get()).into());
        }

        let color = selection
            .color_id
            .map(|color| chosen_color(catalog, &product, color))
            .transpose()?;

        let tables = catalog.list_pricing_tables(Some(segment))?;
        let unit_price = resolve_price(
            product.base_price,
            segment,
            &tables,
            selection.pricing_table_id,
        )?;

        let mut input = LineItemInput::for_product(&product, unit_price, selection.quantity);

        if let Some(color) = color {
            input = input.with_color(color.id, color.name);
        }

        let line = self.cart.add(input)?;

        info!(
            product = %line.product_id,
            quantity = line.quantity,
            unit_price = %line.unit_price,
            "added to cart"
        );

        Ok(line)
    }

    /// Render the current cart as an order transcript.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] if the cart is empty.
    pub fn order_message(&self, placed_at: DateTime) -> Result<String, SessionError> {
        Ok(self
            .formatter
            .format(self.cart.items(), Some(&self.user), placed_at)?)
    }

    /// Render the cart, send it, and clear the cart once the send succeeds.
    ///
    /// Returns the message that was sent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] for an empty cart, or
    /// [`SessionError::Dispatch`] if sending fails. The cart is kept on error.
    #[tracing::instrument(skip(self, dispatcher), fields(user = %self.user.id))]
    pub fn checkout<D: Dispatcher>(
        &mut self,
        dispatcher: &mut D,
        destination: &Destination,
        placed_at: DateTime,
    ) -> Result<String, SessionError> {
        let message = self.order_message(placed_at)?;

        if let Err(error) = dispatcher.send(&message, destination) {
            warn!(%error, "order dispatch failed, keeping cart");

            return Err(error.into());
        }

        info!(
            lines = self.cart.len(),
            total = %self.cart.total(),
            "order dispatched"
        );

        self.cart.clear();

        Ok(message)
    }
}

fn chosen_color<C: CatalogReader>(
    catalog: &C,
    product: &Product,
    color: ColorId,
) -> Result<Color, SessionError> {
    let unavailable = ValidationError::ColorUnavailable {
        product: product.id.get(),
        color: color.get(),
    };

    if !product.offers_color(color) {
        return Err(unavailable.into());
    }

    let color = catalog.get::<Color>(color)?;

    if !color.active {
        return Err(unavailable.into());
    }

    Ok(color)
}
