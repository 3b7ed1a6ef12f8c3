//! Vitrine
//!
//! Vitrine is a B2B furniture ordering engine: a product catalog with
//! per-segment pricing tables, a persistent shopping cart, and order
//! transcripts handed to a messaging channel.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod ids;
pub mod order;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod segments;
pub mod session;
pub mod validation;
