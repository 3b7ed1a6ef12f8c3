//! Multipliers

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Fractional digits kept on every multiplier.
pub const MULTIPLIER_SCALE: u32 = 4;

/// Fractional digits shown for percentages.
const PERCENT_SCALE: u32 = 1;

/// Fixed-point factor applied to a base price (e.g. `1.1000` for +10%).
///
/// Always strictly positive and held at four fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Multiplier(Decimal);

impl Multiplier {
    /// Create a multiplier, rounding half-up to four fractional digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveMultiplier`] if the value is not
    /// strictly positive after rounding, or [`ValidationError::InvalidDecimal`]
    /// if its markup cannot be expressed in percent.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        let mut rounded =
            value.round_dp_with_strategy(MULTIPLIER_SCALE, RoundingStrategy::MidpointAwayFromZero);

        if rounded <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveMultiplier(value));
        }

        if (rounded - Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED).is_none() {
            return Err(ValidationError::InvalidDecimal(value.to_string()));
        }

        rounded.rescale(MULTIPLIER_SCALE);

        Ok(Self(rounded))
    }

    /// Build a multiplier from a markup percentage: `(100 + percent) / 100`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveMultiplier`] for percentages of -100 or below.
    pub fn from_percent(percent: Decimal) -> Result<Self, ValidationError> {
        let hundred = Decimal::ONE_HUNDRED;

        let value = hundred
            .checked_add(percent)
            .and_then(|sum| sum.checked_div(hundred))
            .ok_or_else(|| ValidationError::InvalidDecimal(percent.to_string()))?;

        Self::new(value)
    }

    /// The raw factor.
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Markup over the base price as a fraction (`0.1` for `1.1000`).
    #[must_use]
    pub fn markup(self) -> Percentage {
        Percentage::from(self.0 - Decimal::ONE)
    }

    /// Markup in percent points, half-up to one fractional digit (`10.0` for `1.1000`).
    #[must_use]
    pub fn to_percent(self) -> Decimal {
        let mut points = ((self.markup() * Decimal::ONE) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero);

        points.rescale(PERCENT_SCALE);
        points
    }

    /// Signed percent label (`+10.0%`, `-10.0%`).
    #[must_use]
    pub fn percent_label(self) -> String {
        let points = self.to_percent();

        if points.is_sign_negative() && !points.is_zero() {
            format!("{points}%")
        } else {
            format!("+{}%", points.abs())
        }
    }

    /// What a 100.00 base price becomes under this multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AmountOverflow`] if the price is out of range.
    pub fn example_price(self) -> Result<Decimal, ValidationError> {
        apply_multiplier(Decimal::ONE_HUNDRED, self)
    }
}

/// Multiply an amount by a multiplier, half-up to two fractional digits.
///
/// # Errors
///
/// Returns [`ValidationError::AmountOverflow`] if the product is out of range.
pub fn apply_multiplier(amount: Decimal, multiplier: Multiplier) -> Result<Decimal, ValidationError> {
    let mut scaled = amount
        .checked_mul(multiplier.value())
        .ok_or(ValidationError::AmountOverflow)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    scaled.rescale(2);

    Ok(scaled)
}

impl TryFrom<Decimal> for Multiplier {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Multiplier> for Decimal {
    fn from(value: Multiplier) -> Self {
        value.0
    }
}

impl FromStr for Multiplier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| ValidationError::InvalidDecimal(s.to_string()))?;

        Self::new(value)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_keeps_four_fractional_digits() -> TestResult {
        let multiplier = Multiplier::new(dec!(1.1))?;

        assert_eq!(multiplier.to_string(), "1.1000");

        Ok(())
    }

    #[test]
    fn new_rounds_half_up() -> TestResult {
        assert_eq!(Multiplier::new(dec!(1.12345))?.value(), dec!(1.1235));

        Ok(())
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(
            Multiplier::new(Decimal::ZERO),
            Err(ValidationError::NonPositiveMultiplier(Decimal::ZERO))
        );
        assert!(Multiplier::new(dec!(-0.5)).is_err());
        assert!(Multiplier::new(dec!(0.00001)).is_err(), "rounds to zero");
    }

    #[test]
    fn percent_to_multiplier() -> TestResult {
        assert_eq!(Multiplier::from_percent(dec!(10))?.value(), dec!(1.1));
        assert_eq!(Multiplier::from_percent(dec!(-10))?.value(), dec!(0.9));
        assert_eq!(Multiplier::from_percent(dec!(25))?.value(), dec!(1.25));

        Ok(())
    }

    #[test]
    fn percent_of_minus_hundred_is_rejected() {
        assert!(Multiplier::from_percent(dec!(-100)).is_err());
    }

    #[test]
    fn multiplier_to_percent() -> TestResult {
        assert_eq!(Multiplier::new(dec!(1.1))?.to_percent(), dec!(10.0));
        assert_eq!(Multiplier::new(dec!(0.9))?.to_percent(), dec!(-10.0));
        assert_eq!(Multiplier::new(dec!(1.1234))?.to_percent(), dec!(12.3));
        assert_eq!(Multiplier::new(dec!(1.12355))?.to_percent(), dec!(12.4));

        Ok(())
    }

    #[test]
    fn percent_round_trip_stays_within_rounding_tolerance() -> TestResult {
        for raw in [dec!(1.0), dec!(1.1234), dec!(0.9876), dec!(2.5), dec!(1.0001)] {
            let original = Multiplier::new(raw)?;
            let round_tripped = Multiplier::from_percent(original.to_percent())?;
            let drift = (original.value() - round_tripped.value()).abs();

            assert!(
                drift <= dec!(0.0005),
                "{original} drifted to {round_tripped}"
            );
        }

        Ok(())
    }

    #[test]
    fn percent_labels_are_signed() -> TestResult {
        assert_eq!(Multiplier::new(dec!(1.15))?.percent_label(), "+15.0%");
        assert_eq!(Multiplier::new(dec!(0.9))?.percent_label(), "-10.0%");
        assert_eq!(Multiplier::new(Decimal::ONE)?.percent_label(), "+0.0%");

        Ok(())
    }

    #[test]
    fn example_price_is_hundred_times_multiplier() -> TestResult {
        assert_eq!(Multiplier::new(dec!(1.2))?.example_price()?, dec!(120.00));

        Ok(())
    }

    #[test]
    fn apply_multiplier_rounds_half_up_to_cents() -> TestResult {
        // 45.00 * 1.1500 = 51.75 exactly; 33.33 * 1.1500 = 38.3295 -> 38.33
        let multiplier = Multiplier::new(dec!(1.15))?;

        assert_eq!(apply_multiplier(dec!(45.00), multiplier)?, dec!(51.75));
        assert_eq!(apply_multiplier(dec!(33.33), multiplier)?, dec!(38.33));
        // 0.05 * 1.1 = 0.055 -> 0.06
        assert_eq!(
            apply_multiplier(dec!(0.05), Multiplier::new(dec!(1.1))?)?,
            dec!(0.06)
        );

        Ok(())
    }

    #[test]
    fn out_of_range_amounts_are_rejected() -> TestResult {
        assert_eq!(
            apply_multiplier(Decimal::MAX, Multiplier::new(dec!(1.1))?),
            Err(ValidationError::AmountOverflow)
        );
        assert_eq!(
            Multiplier::new(Decimal::MAX),
            Err(ValidationError::InvalidDecimal(Decimal::MAX.to_string()))
        );

        Ok(())
    }

    #[test]
    fn parses_and_serializes_as_string() -> TestResult {
        let multiplier: Multiplier = "1.1500".parse()?;

        assert_eq!(serde_json::to_string(&multiplier)?, "\"1.1500\"");
        assert_eq!(serde_json::from_str::<Multiplier>("\"1.15\"")?, multiplier);
        assert!(serde_json::from_str::<Multiplier>("\"0\"").is_err());

        Ok(())
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "abc".parse::<Multiplier>(),
            Err(ValidationError::InvalidDecimal(_))
        ));
    }
}
