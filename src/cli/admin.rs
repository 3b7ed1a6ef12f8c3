use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use vitrine::{
    catalog::{
        CatalogStore,
        models::{Color, NewColor, NewPricingTable, PricingTable, Product, ProductId},
    },
    pricing::multiplier::Multiplier,
    segments::Segment,
};

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Add a color
    CreateColor(CreateColorArgs),

    /// Add a pricing table
    CreatePricingTable(CreatePricingTableArgs),

    /// Withdraw a product from the catalog
    DeleteProduct(DeleteProductArgs),
}

#[derive(Debug, Args)]
struct CreateColorArgs {
    /// Color name
    #[arg(long)]
    name: String,

    /// Swatch as #RGB or #RRGGBB
    #[arg(long)]
    hex: String,
}

#[derive(Debug, Args)]
struct CreatePricingTableArgs {
    /// Table name
    #[arg(long)]
    name: String,

    /// Optional description
    #[arg(long)]
    description: Option<String>,

    /// Segment the table is offered to (loja, restaurante)
    #[arg(long)]
    segment: Segment,

    /// Markup over the base price
    #[command(flatten)]
    markup: MarkupArgs,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct MarkupArgs {
    /// Factor applied to base prices, e.g. 1.1
    #[arg(long)]
    multiplier: Option<Multiplier>,

    /// Markup percentage, e.g. 10
    #[arg(long, allow_negative_numbers = true)]
    percent: Option<Decimal>,
}

#[derive(Debug, Args)]
struct DeleteProductArgs {
    /// Product id
    id: ProductId,
}

pub(super) fn run(context: &mut Context, command: AdminCommand) -> Result<(), String> {
    let user = context.user()?;

    if !user.segment.is_admin() {
        return Err(format!("{} is not an administrator", user.username));
    }

    let catalog = &mut context.catalog;

    match command.command {
        AdminSubcommand::CreateColor(args) => {
            let color = catalog
                .create::<Color>(NewColor {
                    name: args.name,
                    hex_code: args.hex,
                })
                .map_err(|error| format!("could not create color: {error}"))?;

            println!("cor {} criada: {} {}", color.id, color.name, color.hex_code);
        }
        AdminSubcommand::CreatePricingTable(args) => {
            let multiplier = match (args.markup.multiplier, args.markup.percent) {
                (Some(multiplier), _) => multiplier,
                (None, Some(percent)) => Multiplier::from_percent(percent)
                    .map_err(|error| format!("invalid markup: {error}"))?,
                (None, None) => return Err("pass --multiplier or --percent".to_string()),
            };

            let table = catalog
                .create::<PricingTable>(NewPricingTable {
                    name: args.name,
                    description: args.description,
                    multiplier,
                    segment: args.segment,
                })
                .map_err(|error| format!("could not create pricing table: {error}"))?;

            println!(
                "tabela {} criada: {} ({}, {})",
                table.id,
                table.name,
                table.multiplier.percent_label(),
                table.segment.label()
            );
        }
        AdminSubcommand::DeleteProduct(args) => {
            catalog
                .delete::<Product>(args.id)
                .map_err(|error| format!("could not delete product {}: {error}", args.id))?;

            println!("produto {} removido", args.id);
        }
    }

    Ok(())
}
