use std::io;

use clap::{Args, Subcommand};
use vitrine::{
    catalog::models::{ColorId, PricingTableId, ProductId},
    session::ItemSelection,
};

use super::{Context, report_degraded};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add a product
    Add(AddArgs),

    /// Change a line's quantity; zero or less removes it
    Update(UpdateArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    #[arg(long)]
    product: ProductId,

    /// Color id, required when the product offers colors
    #[arg(long)]
    color: Option<ColorId>,

    /// Pricing table id, required for stores
    #[arg(long)]
    table: Option<PricingTableId>,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Line number as shown by `cart show`
    line: usize,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Line number as shown by `cart show`
    line: usize,
}

pub(super) fn run(context: &Context, command: CartCommand) -> Result<(), String> {
    let mut session = context.session()?;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let line = session
                .add_to_cart(
                    &context.catalog,
                    ItemSelection {
                        product_id: args.product,
                        color_id: args.color,
                        pricing_table_id: args.table,
                        quantity: args.quantity,
                    },
                )
                .map_err(|error| format!("could not add to cart: {error}"))?;

            println!("{} ({}) x{} adicionado", line.product_name, line.color_name, args.quantity);
        }
        CartSubcommand::Update(args) => {
            session
                .cart_mut()
                .update_quantity(index(args.line)?, args.quantity)
                .map_err(|error| format!("could not update line {}: {error}", args.line))?;
        }
        CartSubcommand::Remove(args) => {
            let removed = session
                .cart_mut()
                .remove(index(args.line)?)
                .map_err(|error| format!("could not remove line {}: {error}", args.line))?;

            println!("{} ({}) removido", removed.product_name, removed.color_name);
        }
        CartSubcommand::Clear => session.cart_mut().clear(),
    }

    report_degraded(session.cart());

    session
        .cart()
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print cart: {error}"))
}

fn index(line: usize) -> Result<usize, String> {
    line.checked_sub(1)
        .ok_or_else(|| "line numbers start at 1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_are_one_based() {
        assert_eq!(index(1), Ok(0));
        assert_eq!(index(3), Ok(2));
        assert!(index(0).is_err());
    }
}
