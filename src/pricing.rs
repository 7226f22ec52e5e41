//! Pricing
//!
//! Resolves the unit price a product sells at for a given quantity, and the
//! line totals derived from it. All arithmetic is done in minor units, which
//! are exact for catalog prices, and saturates instead of overflowing.

use rusty_money::{Money, iso::Currency};

use crate::{products::Product, quantity::Quantity};

/// Returns true when the bulk price applies to `quantity` units of `product`.
///
/// Both `bulk_price` and `min_bulk_quantity` must be set, and the threshold is inclusive.
pub fn bulk_applies(product: &Product<'_>, quantity: Quantity) -> bool {
    match (product.bulk_price, product.min_bulk_quantity) {
        (Some(_), Some(min)) => quantity.get() >= min.get(),
        _ => false,
    }
}

/// Effective unit price of `product` when buying `quantity` units.
pub fn effective_unit_price<'a>(
    product: &Product<'a>,
    quantity: Quantity,
) -> Money<'a, Currency> {
    match product.bulk_price {
        Some(bulk_price) if bulk_applies(product, quantity) => bulk_price,
        _ => product.price,
    }
}

/// Effective unit price multiplied by the quantity.
pub fn line_total<'a>(product: &Product<'a>, quantity: Quantity) -> Money<'a, Currency> {
    multiply(&effective_unit_price(product, quantity), quantity)
}

/// Line total at the standard price, ignoring any bulk price.
pub fn standard_line_total<'a>(product: &Product<'a>, quantity: Quantity) -> Money<'a, Currency> {
    multiply(&product.price, quantity)
}

fn multiply<'a>(unit_price: &Money<'a, Currency>, quantity: Quantity) -> Money<'a, Currency> {
    let minor = unit_price
        .to_minor_units()
        .saturating_mul(i64::from(quantity.get()));

    Money::from_minor(minor, unit_price.currency())
}

/// Sum of line totals in `currency`, saturating instead of overflowing.
///
/// An empty set of lines sums to zero.
pub fn subtotal<'a>(
    currency: &'a Currency,
    totals: impl IntoIterator<Item = Money<'a, Currency>>,
) -> Money<'a, Currency> {
    let minor = totals
        .into_iter()
        .fold(0i64, |acc, total| acc.saturating_add(total.to_minor_units()));

    Money::from_minor(minor, currency)
}
