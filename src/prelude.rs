//! Vitrine prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{AuthError, login},
    cart::{
        Cart, CartError, CartLineItem, CartStats, CartStore, JsonFileCartStore, LineItemInput,
        MemoryCartStore,
    },
    catalog::{
        CatalogError, CatalogReader, CatalogStore, DocumentCatalog, MemoryCatalog, ProductFilter,
        hex::HexCode,
        models::{
            Announcement, Category, Color, PricingTable, Product, Promotion, User,
        },
    },
    ids::TypedId,
    order::{
        Destination, DispatchError, Dispatcher, OrderError, OrderFormatter, WriterDispatcher,
        currency::{find_currency, format_amount, format_money},
    },
    persistence::PersistenceError,
    pricing::{PriceOption, PricingError, multiplier::Multiplier, price_options, resolve_price},
    segments::{Segment, UserSegment},
    session::{ItemSelection, Session, SessionError},
    validation::ValidationError,
};
