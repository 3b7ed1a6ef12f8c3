use std::collections::BTreeMap;

use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use vitrine::{
    catalog::{
        CatalogError, CatalogReader, ProductFilter,
        models::{CategoryId, ColorId},
    },
    order::currency::format_amount,
    pricing::price_options,
};

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Only list products in this category
    #[arg(long)]
    category: Option<CategoryId>,
}

pub(super) fn run(context: &Context, args: CatalogArgs) -> Result<(), String> {
    let user = context.user()?;
    let segment = user.segment.buyer();
    let catalog = &context.catalog;

    let read = |error: CatalogError| format!("failed to read catalog: {error}");

    for announcement in catalog.list_announcements(segment).map_err(read)? {
        println!("📣 {}: {}", announcement.title, announcement.message);
    }

    for promotion in catalog.list_promotions().map_err(read)? {
        match promotion.description {
            Some(description) => println!("🏷️  {}: {description}", promotion.title),
            None => println!("🏷️  {}", promotion.title),
        }
    }

    let categories: BTreeMap<CategoryId, String> = catalog
        .list_categories()
        .map_err(read)?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();
    let colors: BTreeMap<ColorId, String> = catalog
        .list_colors()
        .map_err(read)?
        .into_iter()
        .map(|color| (color.id, color.name))
        .collect();
    let tables = catalog.list_pricing_tables(segment).map_err(read)?;

    let filter = args.category.map(ProductFilter::in_category).unwrap_or_default();
    let products = catalog.list_products(filter).map_err(read)?;

    if products.is_empty() {
        println!("Nenhum produto encontrado");

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Produto", "Categoria", "Cores", "Condição", "Preço"]);

    for product in &products {
        let category = product
            .category_id
            .and_then(|id| categories.get(&id))
            .cloned()
            .unwrap_or_default();
        let product_colors = product
            .available_colors
            .iter()
            .filter_map(|id| colors.get(id).map(|name| format!("{id}: {name}")))
            .collect::<Vec<_>>()
            .join(", ");

        let options: Vec<(String, Decimal)> = match segment {
            Some(segment) => price_options(product.base_price, segment, &tables)
                .map_err(|error| format!("failed to price {}: {error}", product.name))?
                .into_iter()
                .map(|option| {
                    let condition = match option.table {
                        Some(table) => format!("{table}: {}", option.name),
                        None => option.name,
                    };

                    (condition, option.price)
                })
                .collect(),
            None => vec![("Preço base".to_string(), product.base_price)],
        };

        for (condition, price) in options {
            builder.push_record([
                product.id.to_string(),
                product.name.clone(),
                category.clone(),
                product_colors.clone(),
                condition,
                format_amount(price, context.currency),
            ]);
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..6), Alignment::right());

    println!("{table}");

    Ok(())
}
