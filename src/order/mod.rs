//! Orders
//!
//! Renders a cart into the order message sent to the store's messaging
//! channel. Formatting is pure; sending goes through [`Dispatcher`].

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{CartLineItem, sum_line_totals},
    catalog::models::User,
    validation::ValidationError,
};

pub mod currency;
pub mod dispatch;

pub use dispatch::{Destination, DispatchError, Dispatcher, WriterDispatcher};

use currency::format_amount;

const RULE_WIDTH: usize = 30;
const DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
const ANONYMOUS_CLIENT: &str = "Cliente";
const NOTES: [&str; 3] = [
    "Confirmar disponibilidade dos produtos",
    "Definir prazo de entrega",
    "Combinar forma de pagamento",
];
const FOOTER: &str = "✅ Pedido gerado automaticamente pelo sistema";

/// Order rendering failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The cart cannot be turned into an order.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Renders order transcripts in one currency.
#[derive(Debug, Clone, Copy)]
pub struct OrderFormatter {
    currency: &'static Currency,
}

impl OrderFormatter {
    /// Format amounts in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self { currency }
    }

    /// Currency amounts are rendered in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Render the order transcript for `items`, placed by `user` at `placed_at`.
    ///
    /// Every line item is listed in cart order, followed by the grand total.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCart`] if there are no items, or
    /// [`ValidationError::AmountOverflow`] if the total is out of range.
    pub fn format(
        &self,
        items: &[CartLineItem],
        user: Option<&User>,
        placed_at: DateTime,
    ) -> Result<String, OrderError> {
        if items.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        let client = user.map_or_else(
            || ANONYMOUS_CLIENT.to_string(),
            |user| format!("{} ({})", user.name, user.segment.label()),
        );

        let rule = "─".repeat(RULE_WIDTH);
        let mut lines = vec![
            "🛒 *NOVO PEDIDO*".to_string(),
            String::new(),
            format!("👤 *Cliente:* {client}"),
            format!("📅 *Data:* {}", placed_at.strftime(DATE_FORMAT)),
            String::new(),
            "📋 *ITENS DO PEDIDO:*".to_string(),
            rule.clone(),
        ];

        for (index, item) in items.iter().enumerate() {
            lines.extend([
                String::new(),
                format!("*{}. {}*", index + 1, item.product_name),
                format!("   🎨 Cor: {}", item.color_name),
                format!("   📦 Quantidade: {}", item.quantity),
                format!("   💰 Preço unitário: {}", self.amount(item.unit_price)),
                format!("   💵 Subtotal: {}", self.amount(item.total_price)),
            ]);
        }

        let total = sum_line_totals(items)?;

        lines.extend([
            String::new(),
            rule,
            format!("💰 *TOTAL DO PEDIDO: {}*", self.amount(total)),
            String::new(),
            "📝 *Observações:*".to_string(),
        ]);
        lines.extend(NOTES.iter().map(|note| format!("• {note}")));
        lines.extend([String::new(), FOOTER.to_string()]);

        Ok(lines.join("\n"))
    }

    fn amount(&self, amount: Decimal) -> String {
        format_amount(amount, self.currency)
    }
}
