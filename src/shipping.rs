//! Shipping

use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::currency::major_to_minor;

/// Flat-fee shipping, waived once the subtotal reaches a threshold.
///
/// Amounts are in major units and are read in whatever currency the cart is
/// priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotal from which shipping is free (inclusive)
    pub free_shipping_threshold: Decimal,

    /// Fee charged below the threshold
    pub flat_shipping_fee: Decimal,
}

impl ShippingPolicy {
    /// Default free-shipping threshold, in major units.
    pub const DEFAULT_FREE_SHIPPING_THRESHOLD: i64 = 50_000;

    /// Default flat fee, in major units.
    pub const DEFAULT_FLAT_SHIPPING_FEE: i64 = 2_500;

    /// Create a policy.
    pub fn new(free_shipping_threshold: Decimal, flat_shipping_fee: Decimal) -> Self {
        Self {
            free_shipping_threshold,
            flat_shipping_fee,
        }
    }

    /// Threshold in minor units of `currency`, saturating if it does not fit.
    pub fn threshold_minor(&self, currency: &Currency) -> i64 {
        major_to_minor(self.free_shipping_threshold, currency).unwrap_or(i64::MAX)
    }

    /// Flat fee in minor units of `currency`, saturating if it does not fit.
    pub fn fee_minor(&self, currency: &Currency) -> i64 {
        major_to_minor(self.flat_shipping_fee, currency).unwrap_or(i64::MAX)
    }

    /// Shipping charged on a subtotal of `subtotal_minor`.
    pub fn shipping_for(&self, subtotal_minor: i64, currency: &Currency) -> i64 {
        if subtotal_minor >= self.threshold_minor(currency) {
            0
        } else {
            self.fee_minor(currency)
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::new(
            Decimal::from(Self::DEFAULT_FREE_SHIPPING_THRESHOLD),
            Decimal::from(Self::DEFAULT_FLAT_SHIPPING_FEE),
        )
    }
}
