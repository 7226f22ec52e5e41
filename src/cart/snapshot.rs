//! Cart Snapshots
//!
//! A plain-data image of a cart that can be written out and read back.
//! Prices are stored in minor units alongside the ISO currency code.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine, CartObserver, NoopObserver},
    currency::find_currency,
    products::{Product, ProductId},
    quantity::Quantity,
};

/// Errors raised while turning a snapshot back into a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Snapshot currency is not one the store prices in.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Two lines share a product id.
    #[error("Duplicate line for product {0}")]
    DuplicateProduct(ProductId),

    /// A line has a zero quantity.
    #[error("Line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// A standard or bulk price is below zero.
    #[error("Line for product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Serialisable cart image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// ISO 4217 currency code
    pub currency: String,

    /// Lines in cart order
    #[serde(default)]
    pub lines: Vec<SnapshotLine>,
}

/// Serialisable cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// Product as it was when added
    pub product: ProductRecord,

    /// Line quantity
    pub quantity: u32,
}

/// Serialisable product snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Standard unit price in minor units
    pub price_minor: i64,

    /// Bulk unit price in minor units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_price_minor: Option<i64>,

    /// Bulk threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bulk_quantity: Option<u32>,

    /// Availability flag
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    /// Units available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

fn default_in_stock() -> bool {
    true
}

impl From<&Product<'_>> for ProductRecord {
    fn from(product: &Product<'_>) -> Self {
        ProductRecord {
            id: product.id.clone(),
            name: product.name.clone(),
            price_minor: product.price.to_minor_units(),
            bulk_price_minor: product.bulk_price.map(|price| price.to_minor_units()),
            min_bulk_quantity: product.min_bulk_quantity.map(NonZeroU32::get),
            in_stock: product.in_stock,
            stock_quantity: product.stock_quantity,
        }
    }
}

impl ProductRecord {
    fn into_product(self, currency: &'static Currency) -> Product<'static> {
        Product {
            id: self.id,
            name: self.name,
            price: Money::from_minor(self.price_minor, currency),
            bulk_price: self
                .bulk_price_minor
                .map(|minor| Money::from_minor(minor, currency)),
            min_bulk_quantity: self.min_bulk_quantity.and_then(NonZeroU32::new),
            in_stock: self.in_stock,
            stock_quantity: self.stock_quantity,
        }
    }
}

impl CartSnapshot {
    /// Capture `lines` priced in `currency`.
    pub fn from_lines(lines: &[CartLine<'_>], currency: &'static Currency) -> Self {
        CartSnapshot {
            currency: currency.iso_alpha_code.to_string(),
            lines: lines
                .iter()
                .map(|line| SnapshotLine {
                    product: ProductRecord::from(line.product()),
                    quantity: line.quantity().get(),
                })
                .collect(),
        }
    }
}

impl Cart<'static> {
    /// Rebuild a cart from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the currency is unknown, or a line has a
    /// zero quantity, a negative price or repeats a product id.
    pub fn restore(snapshot: CartSnapshot) -> Result<Self, SnapshotError> {
        Cart::restore_with_observer(snapshot, NoopObserver)
    }
}

impl<O: CartObserver> Cart<'static, O> {
    /// Rebuild a cart from a snapshot, reporting later changes to `observer`.
    ///
    /// Restoring does not notify the observer.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the currency is unknown, or a line has a
    /// zero quantity, a negative price or repeats a product id.
    pub fn restore_with_observer(
        snapshot: CartSnapshot,
        observer: O,
    ) -> Result<Self, SnapshotError> {
        let currency = find_currency(&snapshot.currency)
            .ok_or_else(|| SnapshotError::UnknownCurrency(snapshot.currency.clone()))?;

        let mut seen = FxHashSet::default();
        let mut lines = Vec::with_capacity(snapshot.lines.len());

        for line in snapshot.lines {
            let id = line.product.id.clone();

            let quantity = NonZeroU32::new(line.quantity)
                .map(Quantity::from)
                .ok_or_else(|| SnapshotError::ZeroQuantity(id.clone()))?;

            if line.product.price_minor < 0
                || line.product.bulk_price_minor.is_some_and(|minor| minor < 0)
            {
                return Err(SnapshotError::NegativePrice(id));
            }

            if !seen.insert(id.clone()) {
                return Err(SnapshotError::DuplicateProduct(id));
            }

            lines.push(CartLine::new(line.product.into_product(currency), quantity));
        }

        Ok(Cart::from_parts(lines, currency, observer))
    }
}
