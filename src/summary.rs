//! Order Summary
//!
//! Subtotal, shipping and grand total for the current state of a cart. A
//! summary is a plain value computed from the cart on demand; it is never
//! cached, so build a fresh one after every cart change.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartObserver},
    shipping::ShippingPolicy,
};

/// Errors that can occur when rendering a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Writing to the output failed.
    #[error("failed to write order summary: {0}")]
    Io(#[from] io::Error),
}

/// Totals for a cart under a shipping policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary<'a> {
    total_items: u64,
    line_count: usize,
    subtotal: Money<'a, Currency>,
    standard_subtotal: Money<'a, Currency>,
    shipping: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
    free_shipping_threshold: Money<'a, Currency>,
}

impl<'a> OrderSummary<'a> {
    /// Compute the summary for `cart`.
    pub fn from_cart<O: CartObserver>(cart: &Cart<'a, O>, policy: &ShippingPolicy) -> Self {
        let currency = cart.currency();

        let subtotal = cart.total_price();
        let subtotal_minor = subtotal.to_minor_units();
        let shipping_minor = policy.shipping_for(subtotal_minor, currency);

        OrderSummary {
            total_items: cart.total_items(),
            line_count: cart.len(),
            subtotal,
            standard_subtotal: cart.standard_total_price(),
            shipping: Money::from_minor(shipping_minor, currency),
            grand_total: Money::from_minor(
                subtotal_minor.saturating_add(shipping_minor),
                currency,
            ),
            free_shipping_threshold: Money::from_minor(
                policy.threshold_minor(currency),
                currency,
            ),
        }
    }

    /// Sum of line quantities.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Sum of line totals after bulk pricing.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Shipping fee, zero once the subtotal reaches the threshold.
    pub fn shipping(&self) -> Money<'a, Currency> {
        self.shipping
    }

    /// Subtotal plus shipping.
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Whether shipping is waived.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }

    /// How much more the customer has to spend to get free shipping.
    ///
    /// `None` once shipping is already free.
    pub fn amount_to_free_shipping(&self) -> Option<Money<'a, Currency>> {
        if self.is_free_shipping() {
            return None;
        }

        let remaining = self
            .free_shipping_threshold
            .to_minor_units()
            .saturating_sub(self.subtotal.to_minor_units());

        Some(Money::from_minor(remaining, self.subtotal.currency()))
    }

    /// Amount saved through bulk pricing.
    pub fn bulk_savings(&self) -> Money<'a, Currency> {
        let saved = self
            .standard_subtotal
            .to_minor_units()
            .saturating_sub(self.subtotal.to_minor_units());

        Money::from_minor(saved, self.subtotal.currency())
    }

    /// Bulk savings as a fraction of the standard-price subtotal.
    pub fn savings_percent(&self) -> Percentage {
        let standard = self.standard_subtotal.to_minor_units();

        if standard == 0 {
            return Percentage::from(Decimal::ZERO);
        }

        let saved = Decimal::from(self.bulk_savings().to_minor_units());

        Percentage::from(saved / Decimal::from(standard))
    }

    /// Print the cart lines and totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to<O: CartObserver>(
        &self,
        mut out: impl io::Write,
        cart: &Cart<'a, O>,
    ) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Line Total", ""]);

        for (idx, line) in cart.lines().iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.product.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.effective_unit_price),
                format!("{}", line.line_total),
                if line.bulk_applied {
                    "bulk".to_string()
                } else {
                    String::new()
                },
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_totals(&mut out)
    }

    fn write_totals(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        let item_label = if self.total_items == 1 { "item" } else { "items" };

        let mut rows = vec![(
            format!("Subtotal ({} {item_label}):", self.total_items),
            format!("{}", self.subtotal),
        )];

        rows.push((
            "Shipping:".to_string(),
            if self.is_free_shipping() {
                "FREE".to_string()
            } else {
                format!("{}", self.shipping)
            },
        ));

        if self.bulk_savings().to_minor_units() > 0 {
            rows.push(("Bulk savings:".to_string(), format!("{}", self.bulk_savings())));
        }

        rows.push(("Total:".to_string(), format!("{}", self.grand_total)));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, "{label:>label_width$}  {value:>value_width$}")?;
        }

        if let Some(remaining) = self.amount_to_free_shipping() {
            writeln!(out, "Add {remaining} more for free shipping")?;
        }

        writeln!(out)?;

        Ok(())
    }
}
