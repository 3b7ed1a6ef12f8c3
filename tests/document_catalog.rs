//! Document-backed catalog: writes survive a restart, withdrawn records stay
//! addressable by id, and damaged documents fall back to the seed.

use std::fs;

use rust_decimal::dec;
use rusty_money::iso::BRL;
use smallvec::smallvec;
use testresult::TestResult;

use vitrine::{
    catalog::models::{NewColor, NewPricingTable, NewProduct},
    prelude::*,
};

#[test]
fn admin_changes_survive_reopen() -> TestResult {
    let dir = tempfile::tempdir()?;

    {
        let mut catalog = DocumentCatalog::open(dir.path())?;

        let color = catalog.create::<Color>(NewColor {
            name: "Verde Musgo".to_string(),
            hex_code: "#5a6".to_string(),
        })?;

        assert_eq!(color.id, TypedId::new(5));
        assert_eq!(color.hex_code.to_string(), "#55AA66");

        catalog.create::<Product>(NewProduct {
            name: "Cadeira Bistrô".to_string(),
            description: None,
            category_id: Some(TypedId::new(2)),
            base_price: dec!(120.00),
            images: Vec::new(),
            available_colors: smallvec![color.id],
        })?;

        catalog.create::<PricingTable>(NewPricingTable {
            name: "Atacado".to_string(),
            description: None,
            multiplier: Multiplier::new(dec!(0.95))?,
            segment: Segment::Restaurante,
        })?;
    }

    let catalog = DocumentCatalog::open(dir.path())?;

    let chairs = catalog.list_products(ProductFilter::in_category(TypedId::new(2)))?;
    let chair = chairs.first().ok_or("chair not persisted")?;

    assert_eq!(chair.name, "Cadeira Bistrô");
    assert_eq!(catalog.list_colors()?.len(), 5);
    assert_eq!(
        catalog.list_pricing_tables(Some(Segment::Restaurante))?.len(),
        2
    );

    let mut session = Session::login(
        &catalog,
        "restaurante",
        "restaurante123",
        Cart::new(MemoryCartStore::new(), BRL),
    )?;

    let line = session.add_to_cart(
        &catalog,
        ItemSelection {
            product_id: chair.id,
            color_id: Some(TypedId::new(5)),
            pricing_table_id: None,
            quantity: 2,
        },
    )?;

    assert_eq!(line.color_name, "Verde Musgo");
    assert_eq!(line.total_price, dec!(240.00));

    Ok(())
}

#[test]
fn withdrawn_products_leave_listings() -> TestResult {
    let dir = tempfile::tempdir()?;

    DocumentCatalog::open(dir.path())?.delete::<Product>(TypedId::new(2))?;

    let catalog = DocumentCatalog::open(dir.path())?;

    assert_eq!(catalog.list_products(ProductFilter::default())?.len(), 1);

    let withdrawn = catalog.get::<Product>(TypedId::new(2))?;

    assert!(!withdrawn.active);

    let mut session = Session::login(
        &catalog,
        "loja",
        "loja123",
        Cart::new(MemoryCartStore::new(), BRL),
    )?;

    let result = session.add_to_cart(
        &catalog,
        ItemSelection {
            product_id: withdrawn.id,
            color_id: Some(TypedId::new(1)),
            pricing_table_id: Some(TypedId::new(1)),
            quantity: 1,
        },
    );

    assert!(matches!(
        result,
        Err(SessionError::Validation(ValidationError::InactiveProduct(2)))
    ));

    Ok(())
}

#[test]
fn damaged_document_falls_back_then_heals_on_write() -> TestResult {
    let dir = tempfile::tempdir()?;
    let colors = dir.path().join("colors.json");

    DocumentCatalog::open(dir.path())?;
    fs::write(&colors, "{ this is not a color list")?;

    let mut catalog = DocumentCatalog::open(dir.path())?;

    assert_eq!(catalog.list_colors()?.len(), 4, "seed colors used");

    catalog.create::<Color>(NewColor {
        name: "Azul".to_string(),
        hex_code: "#0000FF".to_string(),
    })?;

    let reopened = DocumentCatalog::open(dir.path())?;

    assert_eq!(reopened.list_colors()?.len(), 5);

    Ok(())
}

#[test]
fn missing_references_are_rejected_without_writing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut catalog = DocumentCatalog::open(dir.path())?;

    let result = catalog.create::<Product>(NewProduct {
        name: "Mesa Fantasma".to_string(),
        description: None,
        category_id: Some(TypedId::new(42)),
        base_price: dec!(10.00),
        images: Vec::new(),
        available_colors: smallvec![],
    });

    assert!(matches!(
        result,
        Err(CatalogError::NotFound {
            entity: "category",
            id: 42
        })
    ));

    let reopened = DocumentCatalog::open(dir.path())?;

    assert_eq!(reopened.list_products(ProductFilter::default())?.len(), 2);

    Ok(())
}
