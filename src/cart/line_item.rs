//! Line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::models::{ColorId, Product, ProductId},
    validation::{ValidationError, require_text},
};

/// Color name recorded for products sold without a color choice.
pub const NO_COLOR_LABEL: &str = "Sem cor";

/// Line total for a unit price and quantity.
///
/// # Errors
///
/// Returns [`ValidationError::AmountOverflow`] if the product is out of range.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Result<Decimal, ValidationError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(ValidationError::AmountOverflow)
}

/// Sum of line totals.
///
/// # Errors
///
/// Returns [`ValidationError::AmountOverflow`] if the sum is out of range.
pub fn sum_line_totals<'a>(
    items: impl IntoIterator<Item = &'a CartLineItem>,
) -> Result<Decimal, ValidationError> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.total_price))
        .ok_or(ValidationError::AmountOverflow)
}

/// One (product, color) pairing in a cart, with prices captured when it was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product.
    pub product_id: ProductId,

    /// Product name when added.
    pub product_name: String,

    /// Chosen color; `None` for products without colors.
    #[serde(default)]
    pub color_id: Option<ColorId>,

    /// Color name when added.
    pub color_name: String,

    /// Units ordered, at least one.
    pub quantity: u32,

    /// Unit price when first added.
    pub unit_price: Decimal,

    /// `unit_price × quantity`.
    pub total_price: Decimal,

    /// Product image when added.
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLineItem {
    /// Whether this line holds `product` in `color`.
    #[must_use]
    pub fn is_for(&self, product: ProductId, color: Option<ColorId>) -> bool {
        self.product_id == product && self.color_id == color
    }

    /// Set the quantity and recompute the line total from the stored unit price.
    ///
    /// The line is unchanged if the new total is out of range.
    pub(crate) fn set_quantity(&mut self, quantity: u32) -> Result<(), ValidationError> {
        self.total_price = line_total(self.unit_price, quantity)?;
        self.quantity = quantity;

        Ok(())
    }

    /// Check a restored line item.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank name, a zero quantity, a
    /// non-positive unit price, or a line total out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("productName", &self.product_name)?;
        require_text("colorName", &self.color_name)?;

        if self.quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity(0));
        }

        if self.unit_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(self.unit_price));
        }

        line_total(self.unit_price, self.quantity)?;

        Ok(())
    }
}

/// Request to add units of a product to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemInput {
    /// Product.
    pub product_id: ProductId,

    /// Product name to record.
    pub product_name: String,

    /// Chosen color.
    pub color_id: Option<ColorId>,

    /// Chosen color's name; defaults to [`NO_COLOR_LABEL`].
    pub color_name: Option<String>,

    /// Units to add.
    pub quantity: u32,

    /// Resolved unit price.
    pub unit_price: Decimal,

    /// Image to record.
    pub image: Option<String>,

    /// Whether the product offers colors, making `color_id` mandatory.
    pub color_required: bool,
}

impl LineItemInput {
    /// Start an input for `product` at a resolved unit price.
    #[must_use]
    pub fn for_product(product: &Product, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            color_id: None,
            color_name: None,
            quantity,
            unit_price,
            image: product.thumbnail().map(str::to_string),
            color_required: product.requires_color(),
        }
    }

    /// Attach the chosen color.
    #[must_use]
    pub fn with_color(mut self, color: ColorId, name: impl Into<String>) -> Self {
        self.color_id = Some(color);
        self.color_name = Some(name.into());
        self
    }

    /// Validate the input and turn it into a line item.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NonPositiveQuantity`]: quantity is zero.
    /// - [`ValidationError::NonPositivePrice`]: unit price is zero or negative.
    /// - [`ValidationError::ColorRequired`]: the product has colors but none was chosen.
    /// - [`ValidationError::MissingField`]: the product name is blank.
    /// - [`ValidationError::AmountOverflow`]: the line total is out of range.
    pub fn into_line_item(self) -> Result<CartLineItem, ValidationError> {
        if self.quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity(0));
        }

        if self.unit_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(self.unit_price));
        }

        if self.color_required && self.color_id.is_none() {
            return Err(ValidationError::ColorRequired);
        }

        require_text("productName", &self.product_name)?;

        let color_name = self
            .color_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| NO_COLOR_LABEL.to_string());

        let total_price = line_total(self.unit_price, self.quantity)?;

        Ok(CartLineItem {
            product_id: self.product_id,
            product_name: self.product_name,
            color_id: self.color_id,
            color_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price,
            image: self.image,
        })
    }
}
