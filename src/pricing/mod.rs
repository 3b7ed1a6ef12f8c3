//! Pricing
//!
//! Turns a base price, a buying segment and a chosen pricing table into a unit
//! price. Segment rules live here and nowhere else.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    catalog::models::{PricingTable, PricingTableId},
    segments::Segment,
    validation::ValidationError,
};

pub mod multiplier;

use multiplier::{Multiplier, apply_multiplier};

/// Label of the single price shown to restaurant buyers.
pub const SPECIAL_PRICE_LABEL: &str = "Preço Especial";

/// Price resolution failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The inputs were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The chosen table is not among those offered to the segment.
    #[error("pricing table {0} not found")]
    PricingTableNotFound(PricingTableId),
}

/// Resolve the unit price a buyer pays.
///
/// `tables` is the segment-filtered set offered to the buyer. Restaurant
/// buyers always pay the base price; store buyers pay the base price times
/// the chosen table's multiplier, half-up to cents.
///
/// # Errors
///
/// - [`ValidationError::NegativePrice`]: the base price is below zero.
/// - [`ValidationError::MissingPricingTier`]: a store buyer chose no table.
/// - [`ValidationError::AmountOverflow`]: the marked-up price is out of range.
/// - [`PricingError::PricingTableNotFound`]: the chosen table is not in `tables`.
pub fn resolve_price(
    base_price: Decimal,
    segment: Segment,
    tables: &[PricingTable],
    selected: Option<PricingTableId>,
) -> Result<Decimal, PricingError> {
    if base_price.is_sign_negative() && !base_price.is_zero() {
        return Err(ValidationError::NegativePrice(base_price).into());
    }

    match segment {
        Segment::Restaurante => Ok(base_price),
        Segment::Loja => {
            let selected = selected.ok_or(ValidationError::MissingPricingTier)?;

            let table = tables
                .iter()
                .find(|table| table.id == selected)
                .ok_or(PricingError::PricingTableNotFound(selected))?;

            Ok(apply_multiplier(base_price, table.multiplier)?)
        }
    }
}

/// One price a buyer can choose from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceOption {
    /// Table to select for this price, if the buyer must select one.
    pub table: Option<PricingTableId>,

    /// Display name.
    pub name: String,

    /// Multiplier behind the price, if any applies.
    pub multiplier: Option<Multiplier>,

    /// Unit price.
    pub price: Decimal,
}

/// Prices shown to a buyer for one product.
///
/// Store buyers see one option per table. Restaurant buyers see a single
/// special price equal to the base price.
///
/// # Errors
///
/// Returns [`ValidationError::AmountOverflow`] if a marked-up price is out of range.
pub fn price_options(
    base_price: Decimal,
    segment: Segment,
    tables: &[PricingTable],
) -> Result<Vec<PriceOption>, PricingError> {
    match segment {
        Segment::Loja => tables
            .iter()
            .filter(|table| table.segment == Segment::Loja)
            .map(|table| {
                Ok(PriceOption {
                    table: Some(table.id),
                    name: table.name.clone(),
                    multiplier: Some(table.multiplier),
                    price: apply_multiplier(base_price, table.multiplier)?,
                })
            })
            .collect(),
        Segment::Restaurante => {
            let name = tables
                .iter()
                .find(|table| table.segment == Segment::Restaurante)
                .map_or_else(|| SPECIAL_PRICE_LABEL.to_string(), |table| table.name.clone());

            Ok(vec![PriceOption {
                table: None,
                name,
                multiplier: None,
                price: base_price,
            }])
        }
    }
}
