//! Currency rendering

use rust_decimal::Decimal;
use rusty_money::{Findable, Formatter, LocalFormat, Money, Params, Position, Round, iso::Currency};

use crate::validation::ValidationError;

/// Look up an ISO 4217 currency by code, case-insensitively.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] if the code is blank, or
/// [`ValidationError::UnknownCurrency`] if it is not a known currency.
pub fn find_currency(code: &str) -> Result<&'static Currency, ValidationError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::MissingField("currency"));
    }

    Currency::find(&code.to_ascii_uppercase())
        .ok_or_else(|| ValidationError::UnknownCurrency(code.to_string()))
}

const SYMBOL_FIRST: &[Position] = &[
    Position::Sign,
    Position::Symbol,
    Position::Space,
    Position::Amount,
];
const SYMBOL_LAST: &[Position] = &[
    Position::Sign,
    Position::Amount,
    Position::Space,
    Position::Symbol,
];

/// Render an amount in the currency's locale with a space after the symbol,
/// half-up to the currency's exponent (`R$ 1.234,56`, `$ 1,234.56`).
#[must_use]
pub fn format_amount(amount: Decimal, currency: &Currency) -> String {
    format_money(&Money::from_decimal(amount, currency))
}

/// Render a [`Money`] value like [`format_amount`].
#[must_use]
pub fn format_money(money: &Money<'_, Currency>) -> String {
    let currency = money.currency();
    let format = LocalFormat::from_locale(currency.locale);

    let params = Params {
        digit_separator: format.digit_separator,
        exponent_separator: format.exponent_separator,
        separator_pattern: format.digit_separator_pattern,
        positions: if currency.symbol_first {
            SYMBOL_FIRST
        } else {
            SYMBOL_LAST
        },
        rounding: Some(currency.exponent),
        symbol: Some(currency.symbol),
        code: Some(currency.iso_alpha_code),
    };

    Formatter::money(&money.round(currency.exponent, Round::HalfUp), params)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use rusty_money::iso::{BRL, JPY, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_brazilian_reais() {
        assert_eq!(format_amount(dec!(1234.56), BRL), "R$ 1.234,56");
        assert_eq!(format_amount(dec!(45), BRL), "R$ 45,00");
        assert_eq!(format_amount(dec!(0), BRL), "R$ 0,00");
        assert_eq!(format_amount(dec!(1234567.8), BRL), "R$ 1.234.567,80");
        assert_eq!(format_amount(dec!(100.000), BRL), "R$ 100,00");
    }

    #[test]
    fn rounds_half_up_to_cents() {
        assert_eq!(format_amount(dec!(0.005), BRL), "R$ 0,01");
        assert_eq!(format_amount(dec!(2.344), BRL), "R$ 2,34");
    }

    #[test]
    fn negative_amounts_lead_with_sign() {
        assert_eq!(format_amount(dec!(-1500), BRL), "-R$ 1.500,00");
    }

    #[test]
    fn separators_follow_the_currency_locale() {
        assert_eq!(format_amount(dec!(1234.56), USD), "$ 1,234.56");
        assert_eq!(format_amount(dec!(1234567.891), USD), "$ 1,234,567.89");
    }

    #[test]
    fn zero_exponent_currencies_have_no_fraction() {
        assert_eq!(format_amount(dec!(1500), JPY), "¥ 1,500");
    }

    #[test]
    fn money_values_format_like_decimals() {
        let money = Money::from_decimal(dec!(150), BRL);

        assert_eq!(format_money(&money), "R$ 150,00");
    }

    #[test]
    fn finds_currencies_by_code() -> TestResult {
        assert_eq!(find_currency("brl")?, BRL);
        assert_eq!(find_currency(" USD ")?, USD);
        assert_eq!(
            find_currency("XYZ"),
            Err(ValidationError::UnknownCurrency("XYZ".to_string()))
        );

        Ok(())
    }
}
