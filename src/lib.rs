//! Medcart
//!
//! Cart and order pricing for a medical equipment storefront: bulk pricing
//! per line, subtotal, and a free-shipping threshold.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod fixtures;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod shipping;
pub mod summary;
pub mod utils;
