//! Fixtures
//!
//! Product catalogs and store configuration loaded from YAML files under a
//! base directory (`./fixtures` by default):
//!
//! - `products/<name>.yml`
//! - `config/<name>.yml`

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::InMemoryCatalog,
    config::{ConfigError, StoreConfig},
    products::Product,
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Store configuration error
    #[error("Invalid store config: {0}")]
    Config(#[from] ConfigError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products
    catalog: InMemoryCatalog<'a>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: InMemoryCatalog::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// Products are inserted in id order so repeated loads produce the same
    /// catalog keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: products::ProductsFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.products.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (id, product_fixture) in entries {
            let product = product_fixture.try_into_product(&id)?;
            let currency = product.currency();

            match self.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => self.currency = Some(currency),
            }

            self.catalog.insert(product);
        }

        Ok(self)
    }

    /// Load a store configuration from `config/<name>.yml`
    ///
    /// Once products are loaded, the configured currency must match theirs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid configuration,
    /// or prices in a different currency from the loaded products.
    pub fn store_config(&self, name: &str) -> Result<StoreConfig, FixtureError> {
        let file_path = self.base_path.join("config").join(format!("{name}.yml"));
        let config = StoreConfig::load(file_path)?;

        let expected = self.currency.unwrap_or(config.currency());

        if expected != config.currency() {
            return Err(FixtureError::CurrencyMismatch(
                expected.iso_alpha_code.to_string(),
                config.currency().iso_alpha_code.to_string(),
            ));
        }

        Ok(config)
    }

    /// Load a fixture set by name
    ///
    /// # Errors
    ///
    /// Returns an error if the product file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;

        Ok(fixture)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Product<'a>, FixtureError> {
        self.catalog
            .get(id)
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Loaded products
    pub fn catalog(&self) -> &InMemoryCatalog<'a> {
        &self.catalog
    }

    /// Currency shared by every loaded product
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Create an empty cart in the fixture currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn cart(&self) -> Result<Cart<'a>, FixtureError> {
        Ok(Cart::new(self.currency()?))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::INR};
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(dir: &Path, kind: &str, name: &str, contents: &str) -> TestResult {
        fs::create_dir_all(dir.join(kind))?;
        fs::write(dir.join(kind).join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn fixture_dir() -> TestResult<TempDir> {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "ward",
            r#"
products:
  monitor:
    name: Patient Monitor
    price: "285000 INR"
  ventilator:
    name: ICU Ventilator
    price: "520000 INR"
    bulk_price: "480000 INR"
    min_bulk_quantity: 2
    stock_quantity: 4
"#,
        )?;

        Ok(dir)
    }

    #[test]
    fn loads_products_and_currency() -> TestResult {
        let dir = fixture_dir()?;
        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("ward")?;

        let ventilator = fixture.product("ventilator")?;

        assert_eq!(fixture.catalog().len(), 2);
        assert_eq!(fixture.currency()?, INR);
        assert_eq!(ventilator.bulk_price, Some(Money::from_major(480_000, INR)));
        assert_eq!(ventilator.stock_quantity, Some(4));

        Ok(())
    }

    #[test]
    fn products_load_in_id_order() -> TestResult {
        let dir = fixture_dir()?;
        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("ward")?;

        let ids: Vec<_> = fixture.catalog().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["monitor", "ventilator"]);

        Ok(())
    }

    #[test]
    fn unknown_product_is_an_error() -> TestResult {
        let dir = fixture_dir()?;
        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("ward")?;

        assert!(matches!(
            fixture.product("defibrillator"),
            Err(FixtureError::ProductNotFound(id)) if id == "defibrillator"
        ));

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "mixed",
            r#"
products:
  a:
    name: A
    price: "1 INR"
  b:
    name: B
    price: "1 USD"
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_products("mixed"),
            Err(FixtureError::CurrencyMismatch(..))
        ));

        Ok(())
    }

    #[test]
    fn cart_requires_loaded_products() {
        let fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(fixture.cart(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn loads_store_config() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "config",
            "default",
            "currency: INR\nflat_shipping_fee: 100\n",
        )?;

        let config = Fixture::with_base_path(dir.path()).store_config("default")?;

        assert_eq!(config.currency(), INR);
        assert_eq!(config.shipping_policy().flat_shipping_fee, Decimal::from(100));

        Ok(())
    }

    #[test]
    fn store_config_must_match_product_currency() -> TestResult {
        let dir = fixture_dir()?;

        write_fixture(dir.path(), "config", "usd", "currency: USD
")?;
        write_fixture(dir.path(), "config", "inr", "currency: INR
")?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("ward")?;

        assert!(matches!(
            fixture.store_config("usd"),
            Err(FixtureError::CurrencyMismatch(expected, found))
                if expected == "INR" && found == "USD"
        ));
        assert_eq!(fixture.store_config("inr")?.currency(), INR);

        Ok(())
    }
}
