//! Validation

use rust_decimal::Decimal;
use thiserror::Error;

/// A caller-correctable problem with the data supplied to an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A store buyer tried to price or add an item without choosing a pricing table.
    #[error("missing pricing tier")]
    MissingPricingTier,

    /// The product offers colors but none was chosen.
    #[error("color required")]
    ColorRequired,

    /// The chosen color is not offered for the product.
    #[error("color {color} is not available for product {product}")]
    ColorUnavailable {
        /// Product id.
        product: u32,
        /// Color id.
        color: u32,
    },

    /// Quantity must be at least one.
    #[error("quantity must be at least 1, got {0}")]
    NonPositiveQuantity(i64),

    /// Unit price must be strictly positive.
    #[error("unit price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    /// Base price must not be negative.
    #[error("price must not be negative, got {0}")]
    NegativePrice(Decimal),

    /// Hex color is not `#RGB` or `#RRGGBB`.
    #[error("malformed hex color: {0}")]
    MalformedHexColor(String),

    /// Pricing multiplier must be strictly positive.
    #[error("multiplier must be positive, got {0}")]
    NonPositiveMultiplier(Decimal),

    /// Text could not be read as a decimal number.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    /// Orders need at least one line item.
    #[error("empty cart")]
    EmptyCart,

    /// A line or order total does not fit in a decimal amount.
    #[error("amount out of range")]
    AmountOverflow,

    /// A required text field was blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The current user has no buying segment.
    #[error("user cannot place orders")]
    NotABuyer,

    /// The product has been withdrawn from the catalog.
    #[error("product {0} is not active")]
    InactiveProduct(u32),

    /// Currency code is not a known ISO 4217 currency.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Dispatch destination is not a usable phone number.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),
}

/// Return `MissingField` when `value` is blank.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] if `value` is empty after trimming.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_rejects_whitespace() {
        assert_eq!(
            require_text("name", "   "),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(require_text("name", "Mesa"), Ok(()));
    }

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(ValidationError::ColorRequired.to_string(), "color required");
        assert_eq!(
            ValidationError::MissingPricingTier.to_string(),
            "missing pricing tier"
        );
        assert_eq!(ValidationError::EmptyCart.to_string(), "empty cart");
    }
}
