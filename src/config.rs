//! Store Configuration
//!
//! Pricing policy that varies per deployment: the store currency and the
//! shipping thresholds. Read from YAML:
//!
//! ```yaml
//! currency: INR
//! free_shipping_threshold: "50000"
//! flat_shipping_fee: "2500"
//! ```

use std::{fs, path::Path, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, INR};
use serde::Deserialize;
use thiserror::Error;

use crate::{currency::find_currency, shipping::ShippingPolicy};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Amount is not a valid decimal, or is negative
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount {
        /// Configuration key
        field: &'static str,
        /// Value as written
        value: String,
    },
}

/// Raw YAML shape of the configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    currency: Option<String>,
    free_shipping_threshold: Option<RawAmount>,
    flat_shipping_fee: Option<RawAmount>,
}

/// Amounts may be written as integers or as quoted decimals.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Integer(i64),
    Text(String),
}

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    currency: &'static Currency,
    shipping: ShippingPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: INR,
            shipping: ShippingPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration from parts.
    pub fn new(currency: &'static Currency, shipping: ShippingPolicy) -> Self {
        Self { currency, shipping }
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a configuration from YAML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, the currency is unknown, or an
    /// amount is not a non-negative decimal.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_norway::from_str(yaml)?
        };

        let defaults = Self::default();

        let currency = match raw.currency {
            Some(code) => {
                find_currency(code.trim()).ok_or(ConfigError::UnknownCurrency(code))?
            }
            None => defaults.currency,
        };

        let free_shipping_threshold = parse_amount(
            "free_shipping_threshold",
            raw.free_shipping_threshold,
            defaults.shipping.free_shipping_threshold,
        )?;

        let flat_shipping_fee = parse_amount(
            "flat_shipping_fee",
            raw.flat_shipping_fee,
            defaults.shipping.flat_shipping_fee,
        )?;

        Ok(Self {
            currency,
            shipping: ShippingPolicy::new(free_shipping_threshold, flat_shipping_fee),
        })
    }

    /// Store currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Shipping policy.
    pub fn shipping_policy(&self) -> ShippingPolicy {
        self.shipping
    }
}

fn parse_amount(
    field: &'static str,
    value: Option<RawAmount>,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let amount = match value {
        None => return Ok(default),
        Some(RawAmount::Integer(value)) => Ok(Decimal::from(value)),
        Some(RawAmount::Text(value)) => Decimal::from_str(value.trim()).map_err(|_err| value),
    };

    match amount {
        Ok(amount) if !amount.is_sign_negative() => Ok(amount),
        Ok(amount) => Err(ConfigError::InvalidAmount {
            field,
            value: amount.to_string(),
        }),
        Err(value) => Err(ConfigError::InvalidAmount { field, value }),
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() -> TestResult {
        let config = StoreConfig::from_yaml_str("")?;

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.currency(), INR);

        Ok(())
    }

    #[test]
    fn parses_all_keys() -> TestResult {
        let config = StoreConfig::from_yaml_str(
            "currency: USD\nfree_shipping_threshold: \"99.50\"\nflat_shipping_fee: \"7\"\n",
        )?;

        assert_eq!(config.currency(), USD);
        assert_eq!(
            config.shipping_policy(),
            ShippingPolicy::new(Decimal::new(9950, 2), Decimal::from(7))
        );

        Ok(())
    }

    #[test]
    fn accepts_unquoted_integers() -> TestResult {
        let config = StoreConfig::from_yaml_str("free_shipping_threshold: 1000\n")?;

        assert_eq!(
            config.shipping_policy().free_shipping_threshold,
            Decimal::from(1000)
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_currency() {
        let result = StoreConfig::from_yaml_str("currency: ABC\n");

        assert!(matches!(result, Err(ConfigError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn rejects_negative_amount() {
        let result = StoreConfig::from_yaml_str("flat_shipping_fee: \"-1\"\n");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidAmount {
                field: "flat_shipping_fee",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = StoreConfig::from_yaml_str("free_shiping: \"1\"\n");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
