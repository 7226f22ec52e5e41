//! Product Fixtures

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    currency::{find_currency, major_to_minor},
    fixtures::FixtureError,
    products::Product,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "285000 INR")
    pub price: String,

    /// Bulk unit price, in the same currency as `price`
    #[serde(default)]
    pub bulk_price: Option<String>,

    /// Quantity from which the bulk price applies
    #[serde(default)]
    pub min_bulk_quantity: Option<u32>,

    /// Availability flag
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Units on hand
    #[serde(default)]
    pub stock_quantity: Option<u32>,
}

fn in_stock_default() -> bool {
    true
}

impl ProductFixture {
    /// Build the product published under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed, or if the bulk price is in
    /// a different currency from the standard price.
    pub fn try_into_product<'a>(self, id: &str) -> Result<Product<'a>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        let price = Money::from_minor(minor_units, currency);

        let mut product =
            Product::new(id, self.name, price).with_stock(self.in_stock, self.stock_quantity);

        if let Some(bulk_price) = self.bulk_price.as_deref() {
            let (bulk_minor, bulk_currency) = parse_price(bulk_price)?;

            if bulk_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    bulk_currency.iso_alpha_code.to_string(),
                ));
            }

            product = product.with_bulk_price(Money::from_minor(bulk_minor, currency));
        }

        if let Some(min_bulk_quantity) = self.min_bulk_quantity {
            product = product.with_min_bulk_quantity(min_bulk_quantity);
        }

        Ok(product)
    }
}

/// Parse price string (e.g., "2850.50 INR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = find_currency(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    let amount = amount
        .parse::<rust_decimal::Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = major_to_minor(amount, currency)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
