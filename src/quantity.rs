//! Quantities
//!
//! Cart quantities are always positive. Raw input from a caller is
//! normalised here rather than rejected: adds clamp to one, updates below
//! one mean "remove the line".

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

/// A positive line quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    /// Largest representable quantity.
    pub const MAX: Quantity = Quantity(NonZeroU32::MAX);

    /// Returns a quantity for values of at least one, `None` otherwise.
    pub fn new(value: i64) -> Option<Self> {
        if value < 1 {
            return None;
        }

        let value = u32::try_from(value).unwrap_or(u32::MAX);

        NonZeroU32::new(value).map(Self)
    }

    /// Returns a quantity for any value, clamping non-positive values to one
    /// and saturating at [`Quantity::MAX`].
    pub fn clamped(value: i64) -> Self {
        Self::new(value).unwrap_or(Self::ONE)
    }

    /// Normalise a floating point quantity. Fractional, non-finite and
    /// non-positive values become one.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is integral and clamped to the i64 range before casting"
    )]
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value.fract() != 0.0 {
            return Self::ONE;
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "bounds only need to be approximate; anything this large saturates anyway"
        )]
        let clamped = value.clamp(i64::MIN as f64, i64::MAX as f64);

        Self::clamped(clamped as i64)
    }

    /// Parse a quantity typed by a user.
    ///
    /// Integers are returned as-is (including zero and negatives, so the
    /// caller can decide between clamping and removal). Integral decimals such
    /// as `"3.0"` parse to their integer value. Anything else yields `1`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is integral and clamped to the i64 range before casting"
    )]
    pub fn from_input(input: &str) -> i64 {
        let input = input.trim();

        if let Ok(value) = input.parse::<i64>() {
            return value;
        }

        match input.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 => {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "bounds only need to be approximate"
                )]
                let clamped = value.clamp(i64::MIN as f64, i64::MAX as f64);

                clamped as i64
            }
            _ => 1,
        }
    }

    /// Quantity as a plain integer.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, saturating at [`Quantity::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Quantity) -> Self {
        Self(self.0.saturating_add(other.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<NonZeroU32> for Quantity {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_positive() {
        assert_eq!(Quantity::new(0), None);
        assert_eq!(Quantity::new(-3), None);
        assert_eq!(Quantity::new(4).map(Quantity::get), Some(4));
    }

    #[test]
    fn clamped_normalises_to_one() {
        assert_eq!(Quantity::clamped(-4), Quantity::ONE);
        assert_eq!(Quantity::clamped(0), Quantity::ONE);
        assert_eq!(Quantity::clamped(7).get(), 7);
    }

    #[test]
    fn clamped_saturates_large_values() {
        assert_eq!(Quantity::clamped(i64::MAX), Quantity::MAX);
    }

    #[test]
    fn from_f64_handles_fractions_and_nan() {
        assert_eq!(Quantity::from_f64(2.5), Quantity::ONE);
        assert_eq!(Quantity::from_f64(f64::NAN), Quantity::ONE);
        assert_eq!(Quantity::from_f64(-2.0), Quantity::ONE);
        assert_eq!(Quantity::from_f64(6.0).get(), 6);
    }

    #[test]
    fn from_input_is_lenient() {
        assert_eq!(Quantity::from_input(" 12 "), 12);
        assert_eq!(Quantity::from_input("0"), 0);
        assert_eq!(Quantity::from_input("-2"), -2);
        assert_eq!(Quantity::from_input("3.0"), 3);
        assert_eq!(Quantity::from_input("2.5"), 1);
        assert_eq!(Quantity::from_input("ten"), 1);
        assert_eq!(Quantity::from_input(""), 1);
    }

    #[test]
    fn saturating_add_caps_at_max() {
        assert_eq!(Quantity::MAX.saturating_add(Quantity::ONE), Quantity::MAX);
        assert_eq!(
            Quantity::clamped(2).saturating_add(Quantity::clamped(3)).get(),
            5
        );
    }
}
