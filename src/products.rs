//! Products

use std::{borrow::Borrow, fmt, num::NonZeroU32};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Catalog identifier of a product, stable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Product, as published by the catalog.
///
/// Carts hold a clone of the product taken when the line was created, so
/// later catalog edits do not leak into an existing cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Standard unit price
    pub price: Money<'a, Currency>,

    /// Discounted unit price, only used together with `min_bulk_quantity`
    pub bulk_price: Option<Money<'a, Currency>>,

    /// Inclusive quantity threshold from which `bulk_price` applies
    pub min_bulk_quantity: Option<NonZeroU32>,

    /// Whether the catalog reports the product as available
    pub in_stock: bool,

    /// Units available, if the catalog tracks it
    pub stock_quantity: Option<u32>,
}

impl<'a> Product<'a> {
    /// Create an in-stock product with a standard price and no bulk pricing.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            bulk_price: None,
            min_bulk_quantity: None,
            in_stock: true,
            stock_quantity: None,
        }
    }

    /// Set both bulk pricing fields.
    ///
    /// A `min_quantity` of zero leaves the threshold unset, which disables bulk pricing.
    #[must_use]
    pub fn with_bulk_pricing(self, bulk_price: Money<'a, Currency>, min_quantity: u32) -> Self {
        self.with_bulk_price(bulk_price)
            .with_min_bulk_quantity(min_quantity)
    }

    /// Set the bulk price only.
    #[must_use]
    pub fn with_bulk_price(mut self, bulk_price: Money<'a, Currency>) -> Self {
        self.bulk_price = Some(bulk_price);
        self
    }

    /// Set the bulk threshold only. Zero clears it.
    #[must_use]
    pub fn with_min_bulk_quantity(mut self, min_quantity: u32) -> Self {
        self.min_bulk_quantity = NonZeroU32::new(min_quantity);
        self
    }

    /// Set the stock signals.
    #[must_use]
    pub fn with_stock(mut self, in_stock: bool, stock_quantity: Option<u32>) -> Self {
        self.in_stock = in_stock;
        self.stock_quantity = stock_quantity;
        self
    }

    /// Currency of the standard price.
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }
}
